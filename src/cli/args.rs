//! CLI argument definitions.
//!
//! The global flags live on [`Cli`]; everything after the command token is
//! collected verbatim and handed to the router. Each command then parses
//! its own arguments with [`parse_command_args`].

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser};

use crate::error::{GetlitError, Result};

/// getlit - Scaffold, build, test and deploy Lit Actions.
#[derive(Debug, Parser)]
#[command(name = "getlit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a tool configuration file (overrides the built-in defaults)
    #[arg(short, long, env = "GETLIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to search for the project (overrides current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Command token followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub args: Vec<String>,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, Args)]
pub struct InitArgs {
    /// Directory to install the project into (prompted when omitted)
    pub path: Option<String>,
}

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Build only this action
    pub name: Option<String>,

    /// Keep rebuilding when sources change
    #[arg(short, long)]
    pub watch: bool,
}

/// Arguments for the `new` command.
#[derive(Debug, Clone, Default, Args)]
pub struct NewArgs {
    /// Name of the action to create (prompted when omitted)
    pub name: Option<String>,
}

/// Arguments for the `test` command.
#[derive(Debug, Clone, Default, Args)]
pub struct TestArgs {
    /// Action whose test to run (prompted when omitted)
    pub name: Option<String>,
}

/// Arguments for the `watch` command.
#[derive(Debug, Clone, Default, Args)]
pub struct WatchArgs {
    /// Action whose test re-runs after each rebuild
    pub name: Option<String>,
}

/// Arguments for the `setup` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SetupArgs {
    /// Port for the local capture server (overrides tempServerPort)
    #[arg(long)]
    pub port: Option<u16>,

    /// Print the URL instead of opening a browser
    #[arg(long)]
    pub no_browser: bool,
}

/// Arguments for the `deploy` command.
#[derive(Debug, Clone, Default, Args)]
pub struct DeployArgs {
    /// Action to deploy (prompted when omitted)
    pub name: Option<String>,
}

/// Arguments for the `docs` command.
#[derive(Debug, Clone, Default, Args)]
pub struct DocsArgs {
    /// Print the URL instead of opening a browser
    #[arg(long)]
    pub no_browser: bool,
}

/// Arguments for the `help` command. Extra words are ignored.
#[derive(Debug, Clone, Default, Args)]
pub struct HelpArgs {
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

/// Outcome of parsing a command's own arguments.
#[derive(Debug)]
pub enum ParsedArgs<A> {
    /// Arguments to run the command with.
    Run(A),
    /// `--help` was requested; the rendered text.
    Help(String),
}

/// Parse the arguments that followed command `name`.
///
/// # Errors
///
/// Returns a `Usage` error carrying clap's rendered message when the
/// arguments do not fit `A`.
pub fn parse_command_args<A: Args>(name: &'static str, args: &[String]) -> Result<ParsedArgs<A>> {
    let command = A::augment_args(
        clap::Command::new(name)
            .bin_name(format!("getlit {}", name))
            .no_binary_name(true),
    );

    match command.try_get_matches_from(args) {
        Ok(matches) => A::from_arg_matches(&matches)
            .map(ParsedArgs::Run)
            .map_err(usage_error),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(ParsedArgs::Help(e.render().to_string()))
        }
        Err(e) => Err(usage_error(e)),
    }
}

fn usage_error(e: clap::Error) -> GetlitError {
    GetlitError::Usage {
        message: e.render().to_string().trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn command_token_and_its_flags_are_collected() {
        let cli = Cli::try_parse_from(["getlit", "--debug", "build", "foo", "--watch"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.args, strings(&["build", "foo", "--watch"]));
    }

    #[test]
    fn no_command_leaves_args_empty() {
        let cli = Cli::try_parse_from(["getlit"]).unwrap();
        assert!(cli.args.is_empty());
    }

    #[test]
    fn build_args_parse_name_and_watch() {
        match parse_command_args::<BuildArgs>("build", &strings(&["foo", "-w"])).unwrap() {
            ParsedArgs::Run(args) => {
                assert_eq!(args.name.as_deref(), Some("foo"));
                assert!(args.watch);
            }
            ParsedArgs::Help(_) => panic!("expected arguments"),
        }
    }

    #[test]
    fn help_flag_renders_command_help() {
        match parse_command_args::<SetupArgs>("setup", &strings(&["--help"])).unwrap() {
            ParsedArgs::Help(text) => assert!(text.contains("--no-browser")),
            ParsedArgs::Run(_) => panic!("expected help"),
        }
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        let err = parse_command_args::<NewArgs>("new", &strings(&["--bogus"])).unwrap_err();
        assert!(matches!(err, GetlitError::Usage { .. }));
        assert!(err.to_string().contains("--bogus"));
    }

    #[test]
    fn help_ignores_extra_words() {
        assert!(matches!(
            parse_command_args::<HelpArgs>("help", &strings(&["build", "more"])).unwrap(),
            ParsedArgs::Run(_)
        ));
    }
}
