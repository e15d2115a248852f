use crate::runtime::config::{ConfigLoader, ValidatedConfig};
use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};
use design_codegen::naming::{is_valid_identifier, kebab_to_camel};
use design_codegen::RegistryModuleOptions;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub(crate) const CODEGEN_CONFIG_FILE: &str = "tools/codegen/codegen.toml";

/// Which artifacts a `cargo codegen` invocation produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CodegenTarget {
    All,
    Css,
    Icons,
    IconRegistry,
    Check,
}

impl CodegenTarget {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Css => "css",
            Self::Icons => "icons",
            Self::IconRegistry => "icon-registry",
            Self::Check => "check",
        }
    }
}

/// Parsed `cargo codegen` options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodegenOptions {
    pub target: CodegenTarget,
    pub show_help: bool,
}

pub(super) fn parse_codegen_options(args: &[String]) -> XtaskResult<CodegenOptions> {
    let mut options = CodegenOptions {
        target: CodegenTarget::All,
        show_help: false,
    };
    let mut explicit_target = false;

    for arg in args {
        let target = match arg.as_str() {
            "help" | "--help" | "-h" => {
                options.show_help = true;
                continue;
            }
            "all" => CodegenTarget::All,
            "css" => CodegenTarget::Css,
            "icons" => CodegenTarget::Icons,
            "icon-registry" => CodegenTarget::IconRegistry,
            "check" => CodegenTarget::Check,
            other => {
                return Err(XtaskError::validation(format!(
                    "unknown codegen target: {other}"
                ))
                .with_hint("run `cargo codegen help` for the target list"))
            }
        };
        if explicit_target {
            return Err(XtaskError::validation(format!(
                "codegen accepts a single target (got `{}` and `{arg}`)",
                options.target.as_str()
            )));
        }
        options.target = target;
        explicit_target = true;
    }

    Ok(options)
}

pub(super) fn print_codegen_usage() {
    eprintln!(
        "Usage: cargo codegen [target]\n\
         \n\
         Targets:\n\
           all                 Run css, icons and icon-registry (default)\n\
           css                 Inline each configured shadow stylesheet into a string-constant module\n\
           icons               Extract <path d> data from the icon directory into a map module\n\
           icon-registry       Generate the React icon registry and name union type\n\
           check               Regenerate in memory and fail if any module on disk is stale or missing\n\
         \n\
         Configuration: {CODEGEN_CONFIG_FILE}\n"
    );
}

/// `tools/codegen/codegen.toml`
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CodegenConfig {
    /// Regeneration command recorded in every module header.
    #[serde(default = "default_command")]
    pub(crate) command: String,
    pub(crate) icons: IconsConfig,
    #[serde(default)]
    pub(crate) stylesheets: Vec<StylesheetConfig>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct IconsConfig {
    pub(crate) source_dir: PathBuf,
    pub(crate) path_data_output: PathBuf,
    #[serde(default = "default_path_data_export")]
    pub(crate) path_data_export: String,
    pub(crate) registry_output: PathBuf,
    pub(crate) registry_import_base: String,
    #[serde(default = "default_import_suffix")]
    pub(crate) registry_import_suffix: String,
    #[serde(default = "default_registry_type")]
    pub(crate) registry_type: String,
    #[serde(default = "default_registry_map")]
    pub(crate) registry_map: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StylesheetConfig {
    pub(crate) name: String,
    pub(crate) source: PathBuf,
    pub(crate) output: PathBuf,
    #[serde(default)]
    pub(crate) export: Option<String>,
}

fn default_command() -> String {
    "cargo codegen".into()
}

fn default_path_data_export() -> String {
    "iconPaths".into()
}

fn default_import_suffix() -> String {
    "?react".into()
}

fn default_registry_type() -> String {
    "IconName".into()
}

fn default_registry_map() -> String {
    "iconRegistry".into()
}

impl StylesheetConfig {
    /// Exported constant name; `button-group` becomes `buttonGroupStyles` unless overridden.
    pub(crate) fn export_name(&self) -> String {
        match &self.export {
            Some(export) => export.clone(),
            None => format!("{}Styles", kebab_to_camel(&self.name)),
        }
    }
}

impl IconsConfig {
    pub(crate) fn registry_options(&self) -> RegistryModuleOptions {
        RegistryModuleOptions {
            import_base: self.registry_import_base.clone(),
            import_suffix: self.registry_import_suffix.clone(),
            type_name: self.registry_type.clone(),
            map_name: self.registry_map.clone(),
        }
    }
}

impl ValidatedConfig for CodegenConfig {
    fn validate(&self) -> XtaskResult<()> {
        if self.command.trim().is_empty() {
            return Err(XtaskError::config("`command` must not be empty"));
        }
        if self.stylesheets.is_empty() {
            return Err(XtaskError::config(
                "at least one [[stylesheets]] entry is required",
            ));
        }

        require_path("icons.source_dir", &self.icons.source_dir)?;
        require_path("icons.path_data_output", &self.icons.path_data_output)?;
        require_path("icons.registry_output", &self.icons.registry_output)?;
        if self.icons.registry_import_base.trim().is_empty() {
            return Err(XtaskError::config(
                "`icons.registry_import_base` must not be empty",
            ));
        }
        require_identifier("icons.path_data_export", &self.icons.path_data_export)?;
        require_identifier("icons.registry_type", &self.icons.registry_type)?;
        require_identifier("icons.registry_map", &self.icons.registry_map)?;

        let mut names = BTreeSet::new();
        let mut outputs = BTreeSet::new();
        outputs.insert(self.icons.path_data_output.clone());
        if !outputs.insert(self.icons.registry_output.clone()) {
            return Err(XtaskError::config(format!(
                "`icons.registry_output` duplicates `icons.path_data_output` ({})",
                self.icons.registry_output.display()
            )));
        }

        for sheet in &self.stylesheets {
            if sheet.name.trim().is_empty() {
                return Err(XtaskError::config("stylesheet `name` must not be empty"));
            }
            if !names.insert(sheet.name.as_str()) {
                return Err(XtaskError::config(format!(
                    "duplicate stylesheet name `{}`",
                    sheet.name
                )));
            }
            require_path(&format!("stylesheets.{}.source", sheet.name), &sheet.source)?;
            require_path(&format!("stylesheets.{}.output", sheet.name), &sheet.output)?;
            if !outputs.insert(sheet.output.clone()) {
                return Err(XtaskError::config(format!(
                    "stylesheet `{}` writes to {}, which another module already uses",
                    sheet.name,
                    sheet.output.display()
                )));
            }
            require_identifier(
                &format!("stylesheets.{}.export", sheet.name),
                &sheet.export_name(),
            )?;
        }

        Ok(())
    }
}

fn require_path(field: &str, path: &Path) -> XtaskResult<()> {
    if path.as_os_str().is_empty() {
        return Err(XtaskError::config(format!("`{field}` must not be empty")));
    }
    Ok(())
}

fn require_identifier(field: &str, value: &str) -> XtaskResult<()> {
    if !is_valid_identifier(value) {
        return Err(XtaskError::config(format!(
            "`{field}` is not a valid identifier: `{value}`"
        )));
    }
    Ok(())
}

pub(crate) fn load_codegen_config(ctx: &CommandContext) -> XtaskResult<CodegenConfig> {
    ConfigLoader::<CodegenConfig>::new(ctx.root(), CODEGEN_CONFIG_FILE).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::XtaskErrorCategory;

    const MINIMAL: &str = r#"
[icons]
source_dir = "packages/icons/svg"
path_data_output = "packages/web-components/src/generated/icon-paths.ts"
registry_output = "packages/react/src/icons/registry.generated.ts"
registry_import_base = "../../../icons/svg"

[[stylesheets]]
name = "button-group"
source = "packages/web-components/src/button-group/button-group.shadow.css"
output = "packages/web-components/src/generated/styles/button-group.ts"
"#;

    fn parse_config(body: &str) -> CodegenConfig {
        toml::from_str(body).expect("parse codegen config")
    }

    #[test]
    fn options_default_to_all() {
        assert_eq!(
            parse_codegen_options(&[]).expect("parse"),
            CodegenOptions {
                target: CodegenTarget::All,
                show_help: false,
            }
        );
    }

    #[test]
    fn options_accept_each_target() {
        for (arg, target) in [
            ("all", CodegenTarget::All),
            ("css", CodegenTarget::Css),
            ("icons", CodegenTarget::Icons),
            ("icon-registry", CodegenTarget::IconRegistry),
            ("check", CodegenTarget::Check),
        ] {
            let parsed = parse_codegen_options(&[arg.into()]).expect("parse");
            assert_eq!(parsed.target, target);
            assert_eq!(parsed.target.as_str(), arg);
        }
    }

    #[test]
    fn options_reject_unknown_and_repeated_targets() {
        let err = parse_codegen_options(&["fonts".into()]).expect_err("unknown target");
        assert_eq!(err.category, XtaskErrorCategory::Validation);
        assert!(err.to_string().contains("unknown codegen target: fonts"));

        let err =
            parse_codegen_options(&["css".into(), "icons".into()]).expect_err("two targets");
        assert!(err.to_string().contains("single target"));
    }

    #[test]
    fn help_flag_is_recognized() {
        assert!(parse_codegen_options(&["--help".into()]).expect("parse").show_help);
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let config = parse_config(MINIMAL);
        config.validate().expect("valid config");
        assert_eq!(config.command, "cargo codegen");
        assert_eq!(config.icons.path_data_export, "iconPaths");
        assert_eq!(
            config.icons.registry_options(),
            RegistryModuleOptions {
                import_base: "../../../icons/svg".into(),
                import_suffix: "?react".into(),
                type_name: "IconName".into(),
                map_name: "iconRegistry".into(),
            }
        );
        assert_eq!(config.stylesheets[0].export_name(), "buttonGroupStyles");
    }

    #[test]
    fn validation_requires_a_stylesheet() {
        let body = MINIMAL.split("[[stylesheets]]").next().expect("icons section");
        let err = parse_config(body).validate().expect_err("no stylesheets");
        assert_eq!(err.category, XtaskErrorCategory::Config);
        assert!(err.to_string().contains("at least one [[stylesheets]]"));
    }

    #[test]
    fn validation_rejects_duplicate_names_and_outputs() {
        let duplicate_name = format!(
            "{MINIMAL}\n[[stylesheets]]\nname = \"button-group\"\nsource = \"b.css\"\noutput = \"b.ts\"\n"
        );
        let err = parse_config(&duplicate_name)
            .validate()
            .expect_err("duplicate name");
        assert!(err.to_string().contains("duplicate stylesheet name `button-group`"));

        let duplicate_output = format!(
            "{MINIMAL}\n[[stylesheets]]\nname = \"badge\"\nsource = \"b.css\"\noutput = \"packages/web-components/src/generated/icon-paths.ts\"\n"
        );
        let err = parse_config(&duplicate_output)
            .validate()
            .expect_err("duplicate output");
        assert!(err.to_string().contains("stylesheet `badge` writes to"));
    }

    #[test]
    fn validation_rejects_empty_paths_and_bad_exports() {
        let empty_source = MINIMAL.replace(
            "source = \"packages/web-components/src/button-group/button-group.shadow.css\"",
            "source = \"\"",
        );
        let err = parse_config(&empty_source)
            .validate()
            .expect_err("empty source");
        assert!(err
            .to_string()
            .contains("`stylesheets.button-group.source` must not be empty"));

        let bad_export = format!("{MINIMAL}export = \"default\"\n");
        let err = parse_config(&bad_export)
            .validate()
            .expect_err("reserved export");
        assert!(err.to_string().contains("not a valid identifier"));
    }

    #[test]
    fn unknown_keys_are_rejected_at_parse_time() {
        let body = MINIMAL.replace("[icons]", "[icons]\nsource = \"typo\"");
        assert!(toml::from_str::<CodegenConfig>(&body).is_err());
    }
}
