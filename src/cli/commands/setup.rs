//! Setup command implementation.
//!
//! The `getlit setup` command starts the local capture server, opens the
//! capture page and stores the posted authSig and pkpPublicKey in the
//! workspace settings file.

use std::path::Path;

use crate::auth::AuthServer;
use crate::cli::args::SetupArgs;
use crate::cli::registry::{CommandContext, CommandResult};
use crate::error::Result;
use crate::workspace::{locate_workspace, Credentials, ProjectSettings};

use super::Command;

/// The setup command implementation.
pub struct SetupCommand {
    args: SetupArgs,
}

impl SetupCommand {
    /// Get the command arguments.
    pub fn args(&self) -> &SetupArgs {
        &self.args
    }
}

impl Command for SetupCommand {
    type Args = SetupArgs;
    const NAME: &'static str = "setup";

    fn new(args: SetupArgs) -> Self {
        Self { args }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let paths = locate_workspace(ctx.search_root, ctx.config)?;
        let port = self.args.port.unwrap_or(ctx.config.temp_server_port);

        let server = AuthServer::bind(port)?;
        let url = server.auth_url();
        ctx.ui.message(&format!(
            "Listening at {} for your authSig and pkpPublicKey",
            url
        ));

        if !self.args.no_browser {
            if let Err(e) = webbrowser::open(&url) {
                ctx.ui
                    .warning(&format!("Could not open a browser ({}); visit {} instead", e, url));
            }
        }

        let config_file = paths.config_file.clone();
        server.serve(|credentials| store_credentials(&config_file, credentials))?;

        ctx.ui.success(&format!(
            "Saved authSig and pkpPublicKey to {}",
            paths.config_file.display()
        ));
        Ok(CommandResult::success())
    }
}

/// Merge `credentials` into the settings file at `path`, keeping other keys.
pub(crate) fn store_credentials(path: &Path, credentials: &Credentials) -> Result<String> {
    let mut settings = ProjectSettings::load_or_default(path)?;
    settings.set_credentials(credentials.clone());
    settings.save(path)?;
    tracing::info!("Stored credentials in {}", path.display());
    Ok(format!("Saved to {}", path.display()))
}
