//! End-to-end generators combining discovery, transformation and emission.
//!
//! Each function renders one [`GeneratedModule`] without touching the output
//! location, so callers can either write it or compare it with disk.

use crate::css::resolve_stylesheet;
use crate::emit::{
    emit_path_data_module, emit_registry_module, emit_stylesheet_module, RegistryModuleOptions,
};
use crate::error::{CodegenResult, CodegenWarning};
use crate::output::GeneratedModule;
use crate::registry::build_registry;
use crate::svg::{extract_icon_paths, load_icon_set};
use std::path::Path;

/// A rendered module plus what the caller should report about it.
#[derive(Clone, Debug)]
pub struct Generation {
    pub module: GeneratedModule,
    /// Number of icons in the module; zero for stylesheets.
    pub icon_count: usize,
    pub warnings: Vec<CodegenWarning>,
}

/// Where a stylesheet comes from and where its constant goes.
#[derive(Clone, Copy, Debug)]
pub struct StylesheetJob<'a> {
    /// Shadow stylesheet entry file.
    pub source: &'a Path,
    /// Workspace-relative name of `source` for the provenance comment.
    pub source_label: &'a str,
    pub export_name: &'a str,
    pub output: &'a Path,
}

/// Inline one shadow stylesheet and render its string-constant module.
pub fn generate_stylesheet(job: StylesheetJob<'_>, command: &str) -> CodegenResult<Generation> {
    let css = resolve_stylesheet(job.source)?;
    let contents = emit_stylesheet_module(&css, job.export_name, job.source_label, command)?;
    Ok(Generation {
        module: GeneratedModule::new(job.output, contents),
        icon_count: 0,
        warnings: Vec::new(),
    })
}

/// Extract path data for every icon in `icon_dir` and render the map module.
pub fn generate_icon_paths(
    icon_dir: &Path,
    export_name: &str,
    output: &Path,
    command: &str,
) -> CodegenResult<Generation> {
    let set = load_icon_set(icon_dir)?;
    let map = extract_icon_paths(&set);
    let contents = emit_path_data_module(&map, export_name, command)?;

    let mut warnings = set.warnings;
    warnings.extend(map.warnings);
    Ok(Generation {
        module: GeneratedModule::new(output, contents),
        icon_count: map.entries.len(),
        warnings,
    })
}

/// Bind every icon in `icon_dir` to a component import and render the registry module.
pub fn generate_icon_registry(
    icon_dir: &Path,
    options: &RegistryModuleOptions,
    output: &Path,
    command: &str,
) -> CodegenResult<Generation> {
    let set = load_icon_set(icon_dir)?;
    let registry = build_registry(&set)?;
    let contents = emit_registry_module(&registry, options, command)?;
    Ok(Generation {
        module: GeneratedModule::new(output, contents),
        icon_count: registry.len(),
        warnings: set.warnings,
    })
}
