//! Error and warning types shared by every generator.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Fatal generator failures.
///
/// Every variant aborts the build. Degraded-but-valid states are reported as
/// [`CodegenWarning`] instead.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The root shadow stylesheet does not exist.
    #[error("stylesheet not found: {}", path.display())]
    StylesheetMissing { path: PathBuf },

    /// An `@import` target does not exist on disk.
    #[error(
        "unresolved @import \"{specifier}\" in {}: expected {}",
        importer.display(),
        resolved.display()
    )]
    MissingImport {
        specifier: String,
        importer: PathBuf,
        resolved: PathBuf,
    },

    /// A stylesheet imports itself, directly or transitively.
    #[error("circular @import: {}", format_chain(chain))]
    CircularImport { chain: Vec<PathBuf> },

    /// An `@import` form other than `@import "<relative-path>";`.
    #[error("unsupported @import form in {}:{line}: `{statement}`", path.display())]
    UnsupportedImport {
        path: PathBuf,
        line: usize,
        statement: String,
    },

    /// The icon asset directory is absent or not a directory.
    #[error("icon directory not found: {} (expected a directory of .svg files)", path.display())]
    IconDirectoryMissing { path: PathBuf },

    /// An icon name does not produce a usable identifier.
    #[error("icon `{name}` maps to `{identifier}`, which is not a valid identifier")]
    InvalidIconName { name: String, identifier: String },

    /// Two or more icon names map to the same identifier.
    #[error("icon identifier collision: {}", format_collisions(collisions))]
    IdentifierCollision {
        /// `(identifier, source names)` pairs, sorted by identifier.
        collisions: Vec<(String, Vec<String>)>,
    },

    /// A configured export or type name is not a valid identifier.
    #[error("`{name}` is not a valid export name")]
    InvalidExportName { name: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// The file or directory the failure is about, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::StylesheetMissing { path }
            | Self::UnsupportedImport { path, .. }
            | Self::IconDirectoryMissing { path }
            | Self::Read { path, .. }
            | Self::Write { path, .. } => Some(path),
            Self::MissingImport { resolved, .. } => Some(resolved),
            Self::CircularImport { chain } => chain.last().map(PathBuf::as_path),
            Self::InvalidIconName { .. }
            | Self::IdentifierCollision { .. }
            | Self::InvalidExportName { .. } => None,
        }
    }

    /// Whether the failure came from the filesystem rather than from the inputs' content.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Write { .. })
    }
}

/// Convenience result type for generator internals.
pub type CodegenResult<T> = Result<T, CodegenError>;

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn format_collisions(collisions: &[(String, Vec<String>)]) -> String {
    collisions
        .iter()
        .map(|(identifier, names)| format!("{identifier} <- {}", names.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Degraded-but-valid states found while generating.
///
/// Generators return these to the caller; they never print.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CodegenWarning {
    /// The icon directory exists but contains no `.svg` files.
    EmptyIconSet { dir: PathBuf },
    /// An icon produced no path data and will render nothing.
    IconWithoutPaths { name: String },
    /// An icon is not well-formed XML; its paths come from a `<path d>` tag scan.
    MalformedSvg { name: String, reason: String },
    /// A file named `.svg` carries no icon name and was skipped.
    UnnamedIcon { path: PathBuf },
}

impl Display for CodegenWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIconSet { dir } => {
                write!(f, "no .svg icons found in {}", dir.display())
            }
            Self::IconWithoutPaths { name } => {
                write!(f, "icon `{name}` has no <path d=\"...\"> data")
            }
            Self::MalformedSvg { name, reason } => {
                write!(
                    f,
                    "icon `{name}` is not well-formed XML ({reason}); path data recovered by tag scan"
                )
            }
            Self::UnnamedIcon { path } => {
                write!(f, "skipping {}: no icon name before `.svg`", path.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_import_message_lists_chain() {
        let err = CodegenError::CircularImport {
            chain: vec![
                PathBuf::from("a.css"),
                PathBuf::from("b.css"),
                PathBuf::from("a.css"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "circular @import: a.css -> b.css -> a.css"
        );
        assert_eq!(err.path(), Some(Path::new("a.css")));
    }

    #[test]
    fn collision_message_names_every_source() {
        let err = CodegenError::IdentifierCollision {
            collisions: vec![(
                "ChevronDown".into(),
                vec!["chevron--down".into(), "chevron-down".into()],
            )],
        };
        assert_eq!(
            err.to_string(),
            "icon identifier collision: ChevronDown <- chevron--down, chevron-down"
        );
    }
}
