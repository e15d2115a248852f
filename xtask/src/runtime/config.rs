//! Typed configuration loading helpers.

use crate::runtime::error::{XtaskError, XtaskResult};
use serde::de::DeserializeOwned;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Semantic checks a config runs after it deserializes.
///
/// TOML parsing only guarantees shape. Rules such as "names are unique" or "paths are not
/// empty" belong here so every loader call site gets them.
pub trait ValidatedConfig {
    /// Return a [`XtaskErrorCategory::Config`](crate::runtime::error::XtaskErrorCategory::Config)
    /// error describing the first violated rule.
    fn validate(&self) -> XtaskResult<()>;
}

/// Generic TOML-backed config loader.
///
/// Typical usage:
///
/// ```rust
/// # use serde::Deserialize;
/// # use std::path::Path;
/// # use xtask::runtime::config::{ConfigLoader, ValidatedConfig};
/// # use xtask::runtime::error::XtaskResult;
/// #[derive(Deserialize)]
/// struct ExampleConfig {
///     enabled: bool,
/// }
///
/// impl ValidatedConfig for ExampleConfig {
///     fn validate(&self) -> XtaskResult<()> {
///         Ok(())
///     }
/// }
///
/// let loader = ConfigLoader::<ExampleConfig>::new(Path::new("/workspace"), "tools/example.toml");
/// let _ = loader.path();
/// ```
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned + ValidatedConfig,
{
    /// Create a loader for the given workspace-relative path.
    pub fn new(root: &Path, relative_path: &str) -> Self {
        Self {
            path: root.join(relative_path),
            _marker: PhantomData,
        }
    }

    /// Load, deserialize and validate the configuration file.
    ///
    /// Missing files, unreadable files, TOML parse failures and semantic violations are all
    /// surfaced as [`XtaskErrorCategory::Config`](crate::runtime::error::XtaskErrorCategory::Config)
    /// with the config path attached as target.
    pub fn load(&self) -> XtaskResult<T> {
        let body = fs::read_to_string(&self.path).map_err(|err| {
            XtaskError::config(format!("failed to read {}: {err}", self.path.display()))
                .with_operation("load config")
                .with_path(&self.path)
        })?;
        let value: T = toml::from_str(&body).map_err(|err| {
            XtaskError::config(format!("failed to parse {}: {err}", self.path.display()))
                .with_operation("parse config")
                .with_path(&self.path)
        })?;
        value
            .validate()
            .map_err(|err| err.with_operation("validate config").with_path(&self.path))?;
        Ok(value)
    }

    /// Return the config path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
