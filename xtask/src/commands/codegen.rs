//! Design-system artifact generation (`cargo codegen`).

mod config;
mod run;

use crate::runtime::context::CommandContext;
use crate::runtime::error::XtaskResult;
use crate::XtaskCommand;
use config::{parse_codegen_options, print_codegen_usage};
pub use config::{CodegenOptions, CodegenTarget};
use run::run_codegen;

/// `cargo codegen`
pub struct CodegenCommand;

impl XtaskCommand for CodegenCommand {
    type Options = CodegenOptions;

    fn parse(args: &[String]) -> XtaskResult<Self::Options> {
        parse_codegen_options(args)
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> XtaskResult<()> {
        if options.show_help {
            print_codegen_usage();
            return Ok(());
        }
        run_codegen(ctx, options.target)
    }
}
