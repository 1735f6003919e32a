//! Build command implementation.
//!
//! The `getlit build` command validates action headers and bundles every
//! source (or just one) into the output directory.

use crate::actions::{build_workspace, EsbuildBundler};
use crate::cli::args::BuildArgs;
use crate::cli::registry::{CommandContext, CommandResult};
use crate::error::Result;
use crate::workspace::locate_workspace;

use super::watch::{watch_sources, WatchPlan};
use super::Command;

/// The build command implementation.
pub struct BuildCommand {
    args: BuildArgs,
}

impl BuildCommand {
    /// Get the command arguments.
    pub fn args(&self) -> &BuildArgs {
        &self.args
    }
}

impl Command for BuildCommand {
    type Args = BuildArgs;
    const NAME: &'static str = "build";

    fn new(args: BuildArgs) -> Self {
        Self { args }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let paths = locate_workspace(ctx.search_root, ctx.config)?;
        let only = self.args.name.as_deref();
        let bundler = EsbuildBundler::from_config(ctx.config);

        ctx.ui.show_header("Bundling the lit actions");
        let report = build_workspace(&paths, ctx.config, only, &bundler, ctx.ui)?;

        if report.is_empty() {
            ctx.ui.warning(&format!(
                "No actions found in {}",
                paths.source_dir.display()
            ));
        } else {
            ctx.ui
                .success(&format!("Built {} action(s)", report.built.len()));
        }

        if self.args.watch {
            let plan = WatchPlan {
                only,
                test: None,
            };
            return watch_sources(ctx, &paths, &plan);
        }

        Ok(CommandResult::success())
    }
}
