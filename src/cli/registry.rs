//! Command registry.
//!
//! This module provides the static command table:
//! - [`CommandDescriptor`] describing one invocable command
//! - [`Registry`] enforcing that every name and alias is unique
//! - [`CommandContext`] handed to each handler
//! - [`CommandResult`] for uniform result reporting

use std::collections::HashMap;
use std::path::Path;

use crate::config::ToolConfig;
use crate::error::{GetlitError, Result};
use crate::ui::UserInterface;

/// Signature every command handler implements.
///
/// Receives the arguments after the command token, unchanged.
pub type Handler = fn(&[String], &mut CommandContext<'_>) -> Result<CommandResult>;

/// Help-menu grouping of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    /// Creating and locating the project.
    Project,
    /// Working with actions.
    Action,
    /// Authentication.
    Account,
    /// Help and documentation.
    Help,
}

impl CommandCategory {
    /// All categories in help-menu order.
    pub const ALL: [CommandCategory; 4] = [
        CommandCategory::Project,
        CommandCategory::Action,
        CommandCategory::Account,
        CommandCategory::Help,
    ];

    /// Heading shown above the category's commands.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Action => "Actions",
            Self::Account => "Account",
            Self::Help => "Help",
        }
    }
}

/// One invocable CLI command.
#[derive(Clone)]
pub struct CommandDescriptor {
    /// Primary invocation token.
    pub name: &'static str,
    /// Alternate tokens.
    pub aliases: &'static [&'static str],
    /// Invocation string shown in help.
    pub usage: &'static str,
    /// One-line summary.
    pub description: &'static str,
    /// Help-menu grouping.
    pub category: CommandCategory,
    /// Entry point.
    pub handler: Handler,
}

impl CommandDescriptor {
    /// The name followed by every alias.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    /// Whether `token` is this command's name or one of its aliases.
    pub fn matches(&self, token: &str) -> bool {
        self.tokens().any(|t| t == token)
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Immutable, collision-free command table.
#[derive(Debug)]
pub struct Registry {
    descriptors: Vec<CommandDescriptor>,
    default_token: String,
}

/// Token used when none is given.
pub const DEFAULT_TOKEN: &str = "help";

impl Registry {
    /// Build a registry, rejecting any token claimed twice.
    ///
    /// The comparison is exact and case-sensitive. The default token is
    /// [`DEFAULT_TOKEN`]; see [`Registry::with_default_token`].
    pub fn new(descriptors: Vec<CommandDescriptor>) -> Result<Self> {
        let mut owners: HashMap<&'static str, &'static str> = HashMap::new();

        for descriptor in &descriptors {
            for token in descriptor.tokens() {
                if let Some(first) = owners.insert(token, descriptor.name) {
                    return Err(GetlitError::DuplicateCommandToken {
                        token: token.to_string(),
                        first: first.to_string(),
                        second: descriptor.name.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            descriptors,
            default_token: DEFAULT_TOKEN.to_string(),
        })
    }

    /// Select the fallback command.
    ///
    /// Fails with a configuration error if no descriptor owns `token`.
    pub fn with_default_token(mut self, token: &str) -> Result<Self> {
        if self.find(token).is_none() {
            return Err(GetlitError::missing_config("defaultCommand"));
        }
        self.default_token = token.to_string();
        Ok(self)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.descriptors
    }

    /// The token dispatched when none (or an unknown one) is given.
    pub fn default_token(&self) -> &str {
        &self.default_token
    }

    /// Descriptor owning `token` exactly.
    pub fn find(&self, token: &str) -> Option<&CommandDescriptor> {
        self.descriptors.iter().find(|d| d.matches(token))
    }

    /// Descriptor for the default token.
    pub fn default_descriptor(&self) -> Result<&CommandDescriptor> {
        self.find(&self.default_token)
            .ok_or_else(|| GetlitError::missing_config("defaultCommand"))
    }
}

/// Everything a handler may need.
pub struct CommandContext<'a> {
    /// The registry being dispatched (help renders it).
    pub registry: &'a Registry,
    /// Tool configuration, loaded once at startup.
    pub config: &'a ToolConfig,
    /// Directory searched for the workspace.
    pub search_root: &'a Path,
    /// Output and prompts.
    pub ui: &'a mut dyn UserInterface,
}

/// Result of command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_args: &[String], _ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        Ok(CommandResult::success())
    }

    fn descriptor(name: &'static str, aliases: &'static [&'static str]) -> CommandDescriptor {
        CommandDescriptor {
            name,
            aliases,
            usage: name,
            description: "",
            category: CommandCategory::Action,
            handler: noop,
        }
    }

    #[test]
    fn unique_tokens_build() {
        let registry = Registry::new(vec![
            descriptor("help", &["show"]),
            descriptor("watch", &["dev"]),
        ])
        .unwrap();

        assert_eq!(registry.descriptors().len(), 2);
        assert_eq!(registry.find("dev").unwrap().name, "watch");
        assert_eq!(registry.find("show").unwrap().name, "help");
        assert!(registry.find("Dev").is_none());
    }

    #[test]
    fn duplicate_alias_names_both_owners() {
        let err = Registry::new(vec![
            descriptor("watch", &["dev"]),
            descriptor("serve", &["dev"]),
        ])
        .unwrap_err();

        match err {
            GetlitError::DuplicateCommandToken {
                token,
                first,
                second,
            } => {
                assert_eq!(token, "dev");
                assert_eq!(first, "watch");
                assert_eq!(second, "serve");
            }
            other => panic!("Expected DuplicateCommandToken, got {:?}", other),
        }
    }

    #[test]
    fn alias_colliding_with_name_is_rejected() {
        let err = Registry::new(vec![descriptor("init", &[]), descriptor("new", &["init"])])
            .unwrap_err();
        assert!(matches!(err, GetlitError::DuplicateCommandToken { .. }));
    }

    #[test]
    fn alias_repeated_within_one_descriptor_is_rejected() {
        let err = Registry::new(vec![descriptor("docs", &["doc", "doc"])]).unwrap_err();
        assert!(err.to_string().contains("'doc'"));
    }

    #[test]
    fn tokens_are_case_sensitive() {
        let registry =
            Registry::new(vec![descriptor("build", &[]), descriptor("Build", &[])]).unwrap();
        assert_eq!(registry.find("Build").unwrap().name, "Build");
    }

    #[test]
    fn default_token_must_exist() {
        let registry = Registry::new(vec![descriptor("help", &[])]).unwrap();
        let err = registry.with_default_token("missing").unwrap_err();
        assert!(err.to_string().contains("defaultCommand"));
    }

    #[test]
    fn default_token_may_be_an_alias() {
        let registry = Registry::new(vec![descriptor("help", &["show"])])
            .unwrap()
            .with_default_token("show")
            .unwrap();
        assert_eq!(registry.default_descriptor().unwrap().name, "help");
    }

    #[test]
    fn command_result_constructors() {
        assert_eq!(CommandResult::success().exit_code, 0);
        let failure = CommandResult::failure(2);
        assert!(!failure.success);
        assert_eq!(failure.exit_code, 2);
    }
}
