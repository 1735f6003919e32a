//! Init command implementation.
//!
//! The `getlit init` command installs the selected project template and
//! an empty settings file.

use std::path::{Path, PathBuf};

use crate::actions::templates;
use crate::cli::args::InitArgs;
use crate::cli::registry::{CommandContext, CommandResult};
use crate::error::{GetlitError, Result};
use crate::ui::Prompt;
use crate::workspace::{derive_workspace_paths, find_workspace_dirs, ProjectSettings};

use super::Command;

/// The init command implementation.
pub struct InitCommand {
    args: InitArgs,
}

impl InitCommand {
    /// Get the command arguments.
    pub fn args(&self) -> &InitArgs {
        &self.args
    }

    fn install_dir(&self, ctx: &mut CommandContext<'_>) -> Result<String> {
        if let Some(path) = &self.args.path {
            return Ok(path.clone());
        }
        let prompt = Prompt::input(
            "install_dir",
            "Where do you want to install the project?",
            Some("./"),
        );
        Ok(ctx.ui.prompt(&prompt)?.as_string())
    }
}

/// Where the workspace lands for an answer of `dir`.
///
/// An empty answer or `./` installs directly under the search root.
pub fn install_location(search_root: &Path, dir: &str, project_name: &str) -> PathBuf {
    let dir = dir.trim();
    let base = match dir {
        "" | "." | "./" => search_root.to_path_buf(),
        other => search_root.join(other),
    };
    base.join(project_name)
}

impl Command for InitCommand {
    type Args = InitArgs;
    const NAME: &'static str = "init";

    fn new(args: InitArgs) -> Self {
        Self { args }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let project_name = ctx.config.project_name()?;

        let existing = find_workspace_dirs(ctx.search_root, project_name, ctx.config.search_depth)?;
        if let Some(path) = existing.into_iter().next() {
            return Err(GetlitError::ProjectExists { path });
        }

        let dir = self.install_dir(ctx)?;
        let target = install_location(ctx.search_root, &dir, project_name);
        if target.exists() {
            return Err(GetlitError::ProjectExists { path: target });
        }

        let written = templates::install_project(&ctx.config.selected_template, &target)?;
        tracing::debug!("Installed {} template files", written.len());

        let paths = derive_workspace_paths(&target, ctx.config)?;
        if !paths.config_file.exists() {
            ProjectSettings::default().save(&paths.config_file)?;
        }

        ctx.ui.success(&format!(
            "The project has been installed at {}",
            target.display()
        ));
        ctx.ui.message("Next steps:");
        ctx.ui.message("  getlit setup    capture your authSig and pkpPublicKey");
        ctx.ui.message("  getlit build    bundle the actions in src");

        Ok(CommandResult::success())
    }
}
