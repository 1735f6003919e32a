//! Command-line interface for getlit.
//!
//! # Architecture
//!
//! - [`args`] - Global flags and per-command argument definitions
//! - [`registry`] - The command table and the context handed to handlers
//! - [`router`] - Token resolution, suggestions and dispatch
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;
pub mod registry;
pub mod router;

pub use args::{parse_command_args, Cli, ParsedArgs};
pub use commands::{default_registry, Command};
pub use registry::{CommandCategory, CommandContext, CommandDescriptor, CommandResult, Registry};
pub use router::{dispatch, resolve, Resolution};
