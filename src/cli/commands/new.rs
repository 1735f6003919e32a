//! New command implementation.
//!
//! The `getlit new` command creates an action source and its test script
//! from the embedded templates. Files that already exist are left alone.

use std::fs;
use std::path::Path;

use crate::actions::templates;
use crate::cli::args::NewArgs;
use crate::cli::registry::{CommandContext, CommandResult};
use crate::error::{GetlitError, Result};
use crate::ui::{Prompt, UserInterface};
use crate::workspace::locate_workspace;

use super::{validate_action_name, Command};

/// Name offered when prompting.
const DEFAULT_ACTION_NAME: &str = "bar";

/// The new command implementation.
pub struct NewCommand {
    args: NewArgs,
}

impl NewCommand {
    /// Get the command arguments.
    pub fn args(&self) -> &NewArgs {
        &self.args
    }

    fn action_name(&self, ctx: &mut CommandContext<'_>) -> Result<String> {
        if let Some(name) = &self.args.name {
            return Ok(name.clone());
        }
        let prompt = Prompt::input(
            "action_name",
            "What do you want to name the action?",
            Some(DEFAULT_ACTION_NAME),
        );
        Ok(ctx.ui.prompt(&prompt)?.as_string())
    }
}

impl Command for NewCommand {
    type Args = NewArgs;
    const NAME: &'static str = "new";

    fn new(args: NewArgs) -> Self {
        Self { args }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let paths = locate_workspace(ctx.search_root, ctx.config)?;
        let layout = ctx.config.action_layout()?;

        let answer = self.action_name(ctx)?;
        let name = validate_action_name(&answer)?;

        let source = paths.source_dir.join(layout.source_file(name));
        let test = paths.test_dir.join(layout.test_file(name));

        let created_source = write_new(&source, &templates::render_action(name)?, ctx.ui)?;
        let created_test = write_new(&test, &templates::render_action_test()?, ctx.ui)?;

        if created_source || created_test {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

/// Write `content` to `path` unless it exists. Returns whether it wrote.
fn write_new(path: &Path, content: &str, ui: &mut dyn UserInterface) -> Result<bool> {
    if path.exists() {
        ui.error(&format!("Action already exists at {}", path.display()));
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GetlitError::filesystem(parent, e))?;
    }
    fs::write(path, content).map_err(|e| GetlitError::filesystem(path, e))?;
    ui.success(&format!("Created {}", path.display()));
    Ok(true)
}
