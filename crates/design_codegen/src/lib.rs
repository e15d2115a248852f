//! Build-time code generation for the design system's shared artifacts.
//!
//! Three component families render the same widgets without a shared runtime:
//! the React package, the native custom elements, and the plain HTML/CSS
//! variant. This crate derives the artifacts that keep them consistent:
//!
//! - [`css`] inlines `@import` chains of a shadow stylesheet into one string,
//! - [`svg`] reads the icon directory and extracts `<path d>` geometry,
//! - [`registry`] binds icon names to component identifiers for React,
//! - [`emit`] renders those results as source modules,
//! - [`output`] writes modules or checks them for drift.
//!
//! The crate never prints. Degraded states come back as [`CodegenWarning`]s and
//! the caller decides how to surface them.

pub mod css;
pub mod emit;
pub mod error;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod svg;

pub use emit::RegistryModuleOptions;
pub use error::{CodegenError, CodegenResult, CodegenWarning};
pub use output::{GeneratedModule, ModuleStatus};
pub use pipeline::{
    generate_icon_paths, generate_icon_registry, generate_stylesheet, Generation, StylesheetJob,
};
