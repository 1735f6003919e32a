//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait. [`handle`] turns any
//! implementation into a registry [`Handler`](crate::cli::registry::Handler):
//! it parses the command's own arguments, prints help when asked, and runs
//! the command otherwise.
//!
//! [`default_registry`] is the single table of every command, its aliases
//! and its help-menu placement.

pub mod build;
pub mod deploy;
pub mod docs;
pub mod help;
pub mod init;
pub mod new;
pub mod setup;
pub mod watch;

use clap::Args;

use crate::actions::action_names;
use crate::cli::args::{parse_command_args, ParsedArgs};
use crate::cli::registry::{
    CommandCategory, CommandContext, CommandDescriptor, CommandResult, Registry,
};
use crate::config::ActionLayout;
use crate::error::{GetlitError, Result};
use crate::ui::Prompt;
use crate::workspace::WorkspacePaths;

pub use build::BuildCommand;
pub use deploy::DeployCommand;
pub use docs::DocsCommand;
pub use help::HelpCommand;
pub use init::InitCommand;
pub use new::NewCommand;
pub use setup::SetupCommand;
pub use test::TestCommand;
pub use watch::WatchCommand;

/// Trait for command implementations.
pub trait Command: Sized {
    /// Arguments the command accepts after its token.
    type Args: Args;

    /// Token used in usage and help output.
    const NAME: &'static str;

    /// Create the command from parsed arguments.
    fn new(args: Self::Args) -> Self;

    /// Execute the command.
    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandResult>;
}

/// Registry handler for command `C`.
pub fn handle<C: Command>(args: &[String], ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
    match parse_command_args::<C::Args>(C::NAME, args)? {
        ParsedArgs::Run(args) => C::new(args).execute(ctx),
        ParsedArgs::Help(text) => {
            ctx.ui.message(text.trim_end());
            Ok(CommandResult::success())
        }
    }
}

/// Every command the CLI knows.
pub fn default_descriptors() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor {
            name: "init",
            aliases: &["here"],
            usage: "init [<dir>]",
            description: "Create a new Lit Actions project",
            category: CommandCategory::Project,
            handler: handle::<InitCommand>,
        },
        CommandDescriptor {
            name: "build",
            aliases: &[],
            usage: "build [<name>] [--watch]",
            description: "Validate and bundle actions into the output directory",
            category: CommandCategory::Action,
            handler: handle::<BuildCommand>,
        },
        CommandDescriptor {
            name: "new",
            aliases: &["action"],
            usage: "new [<name>]",
            description: "Create an action and its test from the template",
            category: CommandCategory::Action,
            handler: handle::<NewCommand>,
        },
        CommandDescriptor {
            name: "test",
            aliases: &[],
            usage: "test [<name>]",
            description: "Run an action's test script",
            category: CommandCategory::Action,
            handler: handle::<TestCommand>,
        },
        CommandDescriptor {
            name: "watch",
            aliases: &["dev"],
            usage: "watch [<name>]",
            description: "Rebuild on source changes and re-run a test",
            category: CommandCategory::Action,
            handler: handle::<WatchCommand>,
        },
        CommandDescriptor {
            name: "deploy",
            aliases: &[],
            usage: "deploy [<name>]",
            description: "Upload an action and its source to the gateway",
            category: CommandCategory::Action,
            handler: handle::<DeployCommand>,
        },
        CommandDescriptor {
            name: "setup",
            aliases: &[],
            usage: "setup [--port <port>] [--no-browser]",
            description: "Capture authSig and pkpPublicKey from the browser",
            category: CommandCategory::Account,
            handler: handle::<SetupCommand>,
        },
        CommandDescriptor {
            name: "docs",
            aliases: &["doc"],
            usage: "docs [--no-browser]",
            description: "Open the documentation",
            category: CommandCategory::Help,
            handler: handle::<DocsCommand>,
        },
        CommandDescriptor {
            name: "help",
            aliases: &["default", "show"],
            usage: "help",
            description: "Show this menu",
            category: CommandCategory::Help,
            handler: handle::<HelpCommand>,
        },
    ]
}

/// Registry over [`default_descriptors`].
pub fn default_registry() -> Result<Registry> {
    Registry::new(default_descriptors())
}

/// The action to operate on: `given`, or one picked from the workspace.
///
/// # Errors
///
/// Returns `ArtifactNotFound` when the workspace has no action sources and
/// `Usage` when the name would leave the workspace directories.
pub(crate) fn select_action(
    ctx: &mut CommandContext<'_>,
    paths: &WorkspacePaths,
    layout: &ActionLayout,
    given: Option<&str>,
    verb: &str,
) -> Result<String> {
    if let Some(name) = given.map(str::trim).filter(|n| !n.is_empty()) {
        return Ok(validate_action_name(name)?.to_string());
    }

    let names = action_names(paths, layout)?;
    if names.is_empty() {
        return Err(GetlitError::ArtifactNotFound {
            kind: "Action source".to_string(),
            path: paths.source_dir.clone(),
        });
    }

    let prompt = Prompt::select(
        "action",
        &format!("Which action do you want to {}?", verb),
        &names,
    );
    let answer = ctx.ui.prompt(&prompt)?.as_string();
    Ok(validate_action_name(&answer)?.to_string())
}

/// Reject names that would escape the workspace directories.
pub(crate) fn validate_action_name(name: &str) -> Result<&str> {
    let name = name.trim();
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_whitespace);
    if valid {
        Ok(name)
    } else {
        Err(GetlitError::Usage {
            message: format!("Invalid action name: '{}'", name),
        })
    }
}
