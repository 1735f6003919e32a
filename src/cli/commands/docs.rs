//! Docs command implementation.

use crate::cli::args::DocsArgs;
use crate::cli::registry::{CommandContext, CommandResult};
use crate::error::Result;

use super::Command;

/// The docs command implementation.
pub struct DocsCommand {
    args: DocsArgs,
}

impl DocsCommand {
    /// Get the command arguments.
    pub fn args(&self) -> &DocsArgs {
        &self.args
    }
}

impl Command for DocsCommand {
    type Args = DocsArgs;
    const NAME: &'static str = "docs";

    fn new(args: DocsArgs) -> Self {
        Self { args }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let url = &ctx.config.docs_url;
        ctx.ui.message(&format!("Documentation: {}", url));

        if !self.args.no_browser {
            if let Err(e) = webbrowser::open(url) {
                tracing::debug!("Could not open {}: {}", url, e);
                ctx.ui.warning("Could not open a browser; use the link above");
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::default_registry;
    use crate::config::load_default_config;
    use crate::ui::MockUI;
    use std::path::Path;

    #[test]
    fn docs_prints_configured_url() {
        let config = load_default_config().unwrap();
        let registry = default_registry().unwrap();
        let mut ui = MockUI::new();
        let mut ctx = CommandContext {
            registry: &registry,
            config: &config,
            search_root: Path::new("."),
            ui: &mut ui,
        };

        let result = DocsCommand::new(DocsArgs { no_browser: true })
            .execute(&mut ctx)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_message("https://getlit.dev"));
    }
}
