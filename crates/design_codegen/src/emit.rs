//! Source-module emission for generated artifacts.
//!
//! Every emitted module is a pure function of its inputs: no timestamps, no
//! absolute paths, and a fixed entry order, so regenerating from unchanged
//! inputs reproduces the file byte for byte.

use crate::error::{CodegenError, CodegenResult};
use crate::naming::is_valid_identifier;
use crate::registry::IconRegistry;
use crate::svg::PathDataMap;
use std::fmt::Write as _;

/// First line of every generated module.
pub const GENERATED_BANNER: &str = "// Auto-generated — do not edit manually.";

/// Naming and import convention of the React icon registry module.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryModuleOptions {
    /// Import specifier prefix for the SVG assets, relative to the emitted module.
    pub import_base: String,
    /// Suffix the bundler uses to turn an SVG import into a component.
    pub import_suffix: String,
    /// Name of the exported union type.
    pub type_name: String,
    /// Name of the exported name → component map.
    pub map_name: String,
}

impl Default for RegistryModuleOptions {
    fn default() -> Self {
        Self {
            import_base: "./svg".into(),
            import_suffix: "?react".into(),
            type_name: "IconName".into(),
            map_name: "iconRegistry".into(),
        }
    }
}

/// Emit a module exporting one inlined stylesheet as a string constant.
///
/// `source_label` names the original shadow stylesheet in the provenance
/// comment; callers pass a workspace-relative path so output does not depend on
/// the checkout location.
pub fn emit_stylesheet_module(
    css: &str,
    export_name: &str,
    source_label: &str,
    command: &str,
) -> CodegenResult<String> {
    ensure_export_name(export_name)?;
    let mut out = header(command);
    let _ = writeln!(out, "// Source: {source_label}");
    out.push('\n');
    let _ = writeln!(out, "export const {export_name} = {};", js_string(css));
    Ok(out)
}

/// Emit the name → path-data map consumed by the icon custom element.
pub fn emit_path_data_module(
    map: &PathDataMap,
    export_name: &str,
    command: &str,
) -> CodegenResult<String> {
    ensure_export_name(export_name)?;
    let mut out = header(command);
    let names = map
        .entries
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>();
    if names.is_empty() {
        out.push_str("// Icons: (none)\n");
    } else {
        let _ = writeln!(out, "// Icons: {}", names.join(", "));
    }
    out.push('\n');

    if map.entries.is_empty() {
        let _ = writeln!(out, "export const {export_name}: Record<string, string[]> = {{}};");
        return Ok(out);
    }

    let _ = writeln!(out, "export const {export_name}: Record<string, string[]> = {{");
    for entry in &map.entries {
        let paths = entry
            .paths
            .iter()
            .map(|d| js_string(d))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  {}: [{paths}],", js_string(&entry.name));
    }
    out.push_str("};\n");
    Ok(out)
}

/// Emit the React icon registry: one component import per icon, the name union
/// type, and the name → component map.
pub fn emit_registry_module(
    registry: &IconRegistry,
    options: &RegistryModuleOptions,
    command: &str,
) -> CodegenResult<String> {
    ensure_export_name(&options.type_name)?;
    ensure_export_name(&options.map_name)?;

    let mut out = header(command);
    out.push('\n');

    let base = options.import_base.trim_end_matches('/');
    for entry in &registry.entries {
        let specifier = format!("{base}/{}.svg{}", entry.name, options.import_suffix);
        let _ = writeln!(
            out,
            "import {} from {};",
            entry.identifier,
            js_string(&specifier)
        );
    }
    if !registry.is_empty() {
        out.push('\n');
    }

    if registry.is_empty() {
        let _ = writeln!(out, "export type {} = never;", options.type_name);
    } else {
        let _ = writeln!(out, "export type {} =", options.type_name);
        let last = registry.len() - 1;
        for (idx, entry) in registry.entries.iter().enumerate() {
            let terminator = if idx == last { ";" } else { "" };
            let _ = writeln!(out, "  | {}{terminator}", js_string(&entry.name));
        }
    }
    out.push('\n');

    let satisfies = format!("as const satisfies Record<{}, unknown>;", options.type_name);
    if registry.is_empty() {
        let _ = writeln!(out, "export const {} = {{}} {satisfies}", options.map_name);
    } else {
        let _ = writeln!(out, "export const {} = {{", options.map_name);
        for entry in &registry.entries {
            let _ = writeln!(out, "  {}: {},", js_string(&entry.name), entry.identifier);
        }
        let _ = writeln!(out, "}} {satisfies}");
    }
    Ok(out)
}

fn header(command: &str) -> String {
    format!("{GENERATED_BANNER}\n// Run: {command}\n")
}

fn ensure_export_name(name: &str) -> CodegenResult<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(CodegenError::InvalidExportName {
            name: name.to_string(),
        })
    }
}

/// Encode `text` as a double-quoted string literal.
///
/// JSON string encoding escapes quotes, backslashes and control characters;
/// line and paragraph separators are escaped on top so the literal is also
/// valid in pre-ES2019 parsers.
pub fn js_string(text: &str) -> String {
    serde_json::Value::from(text)
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryEntry;
    use crate::svg::IconPaths;
    use pretty_assertions::assert_eq;

    #[test]
    fn stylesheet_module_escapes_css_text() {
        let module = emit_stylesheet_module(
            ".btn::before { content: \"\\2014\"; }\n",
            "buttonStyles",
            "packages/web-components/src/button/button.shadow.css",
            "cargo codegen css",
        )
        .expect("emit");
        assert_eq!(
            module,
            "// Auto-generated — do not edit manually.\n\
             // Run: cargo codegen css\n\
             // Source: packages/web-components/src/button/button.shadow.css\n\
             \n\
             export const buttonStyles = \".btn::before { content: \\\"\\\\2014\\\"; }\\n\";\n"
        );
    }

    #[test]
    fn stylesheet_module_rejects_invalid_export_names() {
        let err = emit_stylesheet_module("", "button-styles", "x.css", "cargo codegen")
            .expect_err("invalid export");
        assert!(matches!(err, CodegenError::InvalidExportName { .. }));
    }

    #[test]
    fn path_data_module_lists_icons_in_order() {
        let map = PathDataMap {
            entries: vec![
                IconPaths {
                    name: "check".into(),
                    paths: vec!["M5 12l5 5L20 7".into()],
                },
                IconPaths {
                    name: "empty".into(),
                    paths: Vec::new(),
                },
            ],
            warnings: Vec::new(),
        };
        let module = emit_path_data_module(&map, "iconPaths", "cargo codegen icons").expect("emit");
        assert_eq!(
            module,
            "// Auto-generated — do not edit manually.\n\
             // Run: cargo codegen icons\n\
             // Icons: check, empty\n\
             \n\
             export const iconPaths: Record<string, string[]> = {\n  \
             \"check\": [\"M5 12l5 5L20 7\"],\n  \
             \"empty\": [],\n\
             };\n"
        );
    }

    #[test]
    fn empty_path_data_module_is_still_valid() {
        let module =
            emit_path_data_module(&PathDataMap::default(), "iconPaths", "cargo codegen icons")
                .expect("emit");
        assert!(module.contains("// Icons: (none)\n"));
        assert!(module.ends_with("export const iconPaths: Record<string, string[]> = {};\n"));
    }

    #[test]
    fn registry_module_emits_imports_union_and_map() {
        let registry = IconRegistry {
            entries: vec![
                RegistryEntry {
                    name: "chevron-down".into(),
                    identifier: "ChevronDown".into(),
                },
                RegistryEntry {
                    name: "x".into(),
                    identifier: "X".into(),
                },
            ],
        };
        let options = RegistryModuleOptions {
            import_base: "../../assets/icons/".into(),
            ..RegistryModuleOptions::default()
        };
        let module =
            emit_registry_module(&registry, &options, "cargo codegen icon-registry").expect("emit");
        assert_eq!(
            module,
            "// Auto-generated — do not edit manually.\n\
             // Run: cargo codegen icon-registry\n\
             \n\
             import ChevronDown from \"../../assets/icons/chevron-down.svg?react\";\n\
             import X from \"../../assets/icons/x.svg?react\";\n\
             \n\
             export type IconName =\n  \
             | \"chevron-down\"\n  \
             | \"x\";\n\
             \n\
             export const iconRegistry = {\n  \
             \"chevron-down\": ChevronDown,\n  \
             \"x\": X,\n\
             } as const satisfies Record<IconName, unknown>;\n"
        );
    }

    #[test]
    fn empty_registry_module_uses_never() {
        let module = emit_registry_module(
            &IconRegistry::default(),
            &RegistryModuleOptions::default(),
            "cargo codegen icon-registry",
        )
        .expect("emit");
        assert!(module.contains("export type IconName = never;\n"));
        assert!(module.ends_with(
            "export const iconRegistry = {} as const satisfies Record<IconName, unknown>;\n"
        ));
    }

    #[test]
    fn js_string_escapes_separators() {
        assert_eq!(js_string("a\u{2028}b"), "\"a\\u2028b\"");
        assert_eq!(js_string("tab\there"), "\"tab\\there\"");
    }
}
