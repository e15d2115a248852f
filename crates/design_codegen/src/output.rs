//! Writing generated modules and checking them for drift.

use crate::error::{CodegenError, CodegenResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A fully rendered build artifact and the location it belongs at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedModule {
    pub path: PathBuf,
    pub contents: String,
}

/// How an on-disk artifact compares with freshly generated text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModuleStatus {
    UpToDate,
    Stale,
    Missing,
}

impl GeneratedModule {
    pub fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }

    /// Write the module, creating its parent directory when absent.
    ///
    /// The destination is always overwritten.
    pub fn write(&self) -> CodegenResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CodegenError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, &self.contents).map_err(|source| CodegenError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Compare the module with what is currently on disk.
    pub fn status(&self) -> CodegenResult<ModuleStatus> {
        match fs::read(&self.path) {
            Ok(existing) if existing == self.contents.as_bytes() => Ok(ModuleStatus::UpToDate),
            Ok(_) => Ok(ModuleStatus::Stale),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(ModuleStatus::Missing),
            Err(source) => Err(CodegenError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{prefix}_{}_{}", process::id(), nanos))
    }

    #[test]
    fn write_creates_missing_directories_and_overwrites() {
        let root = temp_root("output_write");
        let path = root.join("generated/styles/button.ts");

        GeneratedModule::new(&path, "first\n".into())
            .write()
            .expect("first write");
        GeneratedModule::new(&path, "second\n".into())
            .write()
            .expect("second write");

        assert_eq!(fs::read_to_string(&path).expect("read"), "second\n");
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn status_tracks_missing_stale_and_current_files() {
        let root = temp_root("output_status");
        let module = GeneratedModule::new(root.join("icon-paths.ts"), "export {};\n".into());

        assert_eq!(module.status().expect("status"), ModuleStatus::Missing);
        fs::create_dir_all(&root).expect("create root");
        fs::write(module.path(), "// edited by hand\n").expect("write stale");
        assert_eq!(module.status().expect("status"), ModuleStatus::Stale);
        module.write().expect("write");
        assert_eq!(module.status().expect("status"), ModuleStatus::UpToDate);

        let _ = fs::remove_dir_all(root);
    }
}
