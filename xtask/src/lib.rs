//! Workspace maintenance commands (`cargo xtask`).
//!
//! The crate is organized as a small CLI layer over a shared Rust-native automation runtime.
//! Command modules own workflow-specific policy while [`runtime`] owns configuration loading,
//! artifact paths, and workflow recording. Generator logic itself lives in `design_codegen`.

pub mod cli;
pub mod commands;
pub mod runtime;

use crate::cli::TopLevelCommand;
use crate::commands::codegen::CodegenCommand;
use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};

/// Shared command contract for top-level xtask command families.
///
/// Each top-level workflow family owns its own typed option parsing while sharing the same
/// runtime services through [`CommandContext`]. Implementations should treat
/// [`XtaskCommand::parse`] as a pure translation step from raw CLI arguments into a typed options
/// value and keep side effects in [`XtaskCommand::run`].
pub trait XtaskCommand {
    /// Typed options produced by CLI parsing for the command family.
    type Options;

    /// Parse command-line arguments into typed options.
    ///
    /// Implementations should return [`XtaskError::validation`](crate::runtime::error::XtaskError::validation)
    /// for invalid user-facing argument shapes.
    fn parse(args: &[String]) -> XtaskResult<Self::Options>;

    /// Execute the command family using the shared runtime context.
    ///
    /// Implementations should prefer `ctx.workflow()` and `ctx.artifacts()` over constructing
    /// command-local helpers.
    fn run(ctx: &CommandContext, options: Self::Options) -> XtaskResult<()>;
}

/// Executes the `xtask` binary using the current process arguments.
///
/// It creates a fresh [`CommandContext`], parses the top-level command selection, and delegates
/// to the owning command family.
pub fn execute_from_env() -> XtaskResult<()> {
    let parsed = cli::parse(std::env::args().skip(1).collect())?;

    match parsed {
        TopLevelCommand::Codegen(args) => {
            let options = CodegenCommand::parse(&args)?;
            CodegenCommand::run(&CommandContext::new()?, options)
        }
        TopLevelCommand::Help => {
            cli::print_usage();
            Ok(())
        }
    }
}

/// Converts an xtask result into a stable process exit code.
///
/// All command failures currently map to exit code `1` after printing the formatted
/// [`XtaskError`] to stderr.
pub fn exit_code(result: XtaskResult<()>) -> std::process::ExitCode {
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::ExitCode::from(1)
        }
    }
}

impl From<String> for XtaskError {
    fn from(value: String) -> Self {
        XtaskError::validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn exit_code_maps_success_and_failure() {
        assert_eq!(
            format!("{:?}", exit_code(Ok(()))),
            format!("{:?}", ExitCode::SUCCESS)
        );
        assert_eq!(
            format!(
                "{:?}",
                exit_code(Err(XtaskError::generation("icon directory not found")))
            ),
            format!("{:?}", ExitCode::from(1))
        );
    }

    #[test]
    fn plain_string_errors_are_validation_failures() {
        let err: XtaskError = String::from("bad argument").into();
        assert_eq!(
            err.category,
            crate::runtime::error::XtaskErrorCategory::Validation
        );
    }
}
