//! Artifact path management for xtask workflows.

use crate::runtime::error::{XtaskError, XtaskResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

const AUTOMATION_RUNS_DIR: &str = ".artifacts/automation/runs";

/// Central artifact path policy for xtask.
///
/// This service keeps workspace-relative locations consistent across workflow families.
/// Command domains should use it instead of hard-coding ad hoc joins from `ctx.root()`.
#[derive(Clone, Debug)]
pub struct ArtifactManager {
    root: PathBuf,
}

impl ArtifactManager {
    /// Create an artifact manager rooted at the workspace.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the workspace root path used for resolution.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a possibly-relative workspace path.
    ///
    /// Absolute paths are preserved, while relative paths are anchored to the workspace root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Workspace-relative label for a path, with posix separators.
    ///
    /// Generated modules embed these labels, so they must not depend on where the workspace is
    /// checked out. Paths outside the workspace fall back to their full display form.
    pub fn relative_label(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) => path_to_posix(relative),
            Err(_) => path.display().to_string(),
        }
    }

    /// Return the standard automation run root used by [`WorkflowRecorder`](crate::runtime::workflow::WorkflowRecorder).
    pub fn automation_runs_dir(&self) -> PathBuf {
        self.root.join(AUTOMATION_RUNS_DIR)
    }

    /// Ensure a directory exists.
    ///
    /// This helper is idempotent and succeeds when the directory already exists.
    pub fn ensure_dir(&self, path: &Path) -> XtaskResult<()> {
        fs::create_dir_all(path).map_err(|err| {
            XtaskError::io(format!("failed to create {}: {err}", path.display())).with_path(path)
        })
    }
}

fn path_to_posix(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
