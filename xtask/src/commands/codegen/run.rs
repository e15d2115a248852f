use super::config::{load_codegen_config, CodegenConfig, CodegenTarget, StylesheetConfig};
use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};
use design_codegen::{
    generate_icon_paths, generate_icon_registry, generate_stylesheet, Generation, ModuleStatus,
    StylesheetJob,
};

pub(super) fn run_codegen(ctx: &CommandContext, target: CodegenTarget) -> XtaskResult<()> {
    ctx.workflow()
        .with_workflow_run("codegen", Some(target.as_str().into()), || {
            let config = ctx
                .workflow()
                .run_timed_stage("Codegen config: tools/codegen/codegen.toml", || {
                    load_codegen_config(ctx)
                })?;

            match target {
                CodegenTarget::All => {
                    write_stylesheets(ctx, &config)?;
                    write_icon_paths(ctx, &config)?;
                    write_icon_registry(ctx, &config)
                }
                CodegenTarget::Css => write_stylesheets(ctx, &config),
                CodegenTarget::Icons => write_icon_paths(ctx, &config),
                CodegenTarget::IconRegistry => write_icon_registry(ctx, &config),
                CodegenTarget::Check => check_generated(ctx, &config),
            }
        })
}

fn header_command(config: &CodegenConfig, target: CodegenTarget) -> String {
    format!("{} {}", config.command, target.as_str())
}

fn render_stylesheet(
    ctx: &CommandContext,
    config: &CodegenConfig,
    sheet: &StylesheetConfig,
) -> XtaskResult<Generation> {
    let artifacts = ctx.artifacts();
    let source = artifacts.resolve_path(&sheet.source);
    let source_label = artifacts.relative_label(&source);
    let output = artifacts.resolve_path(&sheet.output);
    let export_name = sheet.export_name();
    let job = StylesheetJob {
        source: &source,
        source_label: &source_label,
        export_name: &export_name,
        output: &output,
    };

    generate_stylesheet(job, &header_command(config, CodegenTarget::Css))
        .map_err(|err| XtaskError::from(err).with_operation(format!("generate {} styles", sheet.name)))
}

fn render_icon_paths(ctx: &CommandContext, config: &CodegenConfig) -> XtaskResult<Generation> {
    let icons = &config.icons;
    generate_icon_paths(
        &ctx.artifacts().resolve_path(&icons.source_dir),
        &icons.path_data_export,
        &ctx.artifacts().resolve_path(&icons.path_data_output),
        &header_command(config, CodegenTarget::Icons),
    )
    .map_err(|err| XtaskError::from(err).with_operation("generate icon path map"))
}

fn render_icon_registry(ctx: &CommandContext, config: &CodegenConfig) -> XtaskResult<Generation> {
    let icons = &config.icons;
    generate_icon_registry(
        &ctx.artifacts().resolve_path(&icons.source_dir),
        &icons.registry_options(),
        &ctx.artifacts().resolve_path(&icons.registry_output),
        &header_command(config, CodegenTarget::IconRegistry),
    )
    .map_err(|err| XtaskError::from(err).with_operation("generate icon registry"))
}

/// Print generator warnings, then write the module. Returns the output's workspace label.
fn commit_generation(ctx: &CommandContext, generation: &Generation) -> XtaskResult<String> {
    report_warnings(ctx, generation)?;
    generation.module.write()?;
    Ok(ctx.artifacts().relative_label(generation.module.path()))
}

fn report_warnings(ctx: &CommandContext, generation: &Generation) -> XtaskResult<()> {
    for warning in &generation.warnings {
        ctx.workflow().warn(&warning.to_string())?;
    }
    Ok(())
}

fn write_stylesheets(ctx: &CommandContext, config: &CodegenConfig) -> XtaskResult<()> {
    for sheet in &config.stylesheets {
        ctx.workflow()
            .run_timed_stage(&format!("Codegen css: {}", sheet.name), || {
                let generation = render_stylesheet(ctx, config, sheet)?;
                let label = commit_generation(ctx, &generation)?;
                println!("Generated {} styles: {label}", sheet.name);
                Ok(())
            })?;
    }
    Ok(())
}

fn write_icon_paths(ctx: &CommandContext, config: &CodegenConfig) -> XtaskResult<()> {
    ctx.workflow()
        .run_timed_stage("Codegen icons: path data map", || {
            let generation = render_icon_paths(ctx, config)?;
            let label = commit_generation(ctx, &generation)?;
            println!(
                "Generated icon path map with {} icons: {label}",
                generation.icon_count
            );
            Ok(())
        })
}

fn write_icon_registry(ctx: &CommandContext, config: &CodegenConfig) -> XtaskResult<()> {
    ctx.workflow()
        .run_timed_stage("Codegen icon-registry: React registry", || {
            let generation = render_icon_registry(ctx, config)?;
            let label = commit_generation(ctx, &generation)?;
            println!(
                "Generated icon registry with {} icons: {label}",
                generation.icon_count
            );
            Ok(())
        })
}

fn check_generated(ctx: &CommandContext, config: &CodegenConfig) -> XtaskResult<()> {
    let generations = ctx
        .workflow()
        .run_timed_stage("Codegen check: render modules in memory", || {
            let mut generations = config
                .stylesheets
                .iter()
                .map(|sheet| render_stylesheet(ctx, config, sheet))
                .collect::<XtaskResult<Vec<_>>>()?;
            generations.push(render_icon_paths(ctx, config)?);
            generations.push(render_icon_registry(ctx, config)?);
            Ok(generations)
        })?;

    ctx.workflow()
        .run_timed_stage("Codegen check: compare with disk", || {
            let mut stale = Vec::new();
            let mut missing = Vec::new();
            for generation in &generations {
                report_warnings(ctx, generation)?;
                let label = ctx.artifacts().relative_label(generation.module.path());
                match generation.module.status()? {
                    ModuleStatus::UpToDate => println!("    up to date: {label}"),
                    ModuleStatus::Stale => {
                        println!("    stale: {label}");
                        stale.push(label);
                    }
                    ModuleStatus::Missing => {
                        println!("    missing: {label}");
                        missing.push(label);
                    }
                }
            }

            if stale.is_empty() && missing.is_empty() {
                println!("All {} generated modules are up to date", generations.len());
                return Ok(());
            }

            let mut problems = Vec::new();
            if !stale.is_empty() {
                problems.push(format!("stale: {}", stale.join(", ")));
            }
            if !missing.is_empty() {
                problems.push(format!("missing: {}", missing.join(", ")));
            }
            Err(XtaskError::validation(format!(
                "generated modules are out of date ({})",
                problems.join("; ")
            ))
            .with_operation("codegen check")
            .with_hint(format!("run `{}` and commit the result", config.command)))
        })
}
