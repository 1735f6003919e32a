//! Help command implementation.
//!
//! Renders the command menu from the registry, grouped by category, with
//! usage strings aligned into one column.

use crate::cli::args::HelpArgs;
use crate::cli::registry::{CommandCategory, CommandContext, CommandResult, Registry};
use crate::error::Result;

use super::Command;

/// The help command implementation.
pub struct HelpCommand;

impl Command for HelpCommand {
    type Args = HelpArgs;
    const NAME: &'static str = "help";

    fn new(_args: HelpArgs) -> Self {
        Self
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        ctx.ui.message(&render_help(ctx.registry));
        Ok(CommandResult::success())
    }
}

/// The full help menu for `registry`.
pub fn render_help(registry: &Registry) -> String {
    let width = registry
        .descriptors()
        .iter()
        .map(|d| d.usage.len())
        .max()
        .unwrap_or(0);

    let mut out = format!("getlit CLI [v{}]\n\n", env!("CARGO_PKG_VERSION"));
    out.push_str("Usage: getlit [options] <command> [args]\n");

    for category in CommandCategory::ALL {
        let mut commands = registry
            .descriptors()
            .iter()
            .filter(|d| d.category == category)
            .peekable();
        if commands.peek().is_none() {
            continue;
        }

        out.push_str(&format!("\n{}:\n", category.title()));
        for descriptor in commands {
            out.push_str(&format!(
                "  getlit {:<width$}  {}",
                descriptor.usage,
                descriptor.description,
                width = width
            ));
            if !descriptor.aliases.is_empty() {
                out.push_str(&format!(" (alias: {})", descriptor.aliases.join(", ")));
            }
            out.push('\n');
        }
    }

    out.push_str("\nRun `getlit <command> --help` for command options.");
    out
}
