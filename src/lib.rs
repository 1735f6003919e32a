//! getlit - Scaffold, build, test and deploy Lit Actions.
//!
//! A thin orchestration layer over a JavaScript bundler, a test runner and
//! a content-upload gateway. It locates the project workspace, validates
//! action headers against a JSON schema and routes commands typed on the
//! command line, forgiving small typos.
//!
//! # Modules
//!
//! - [`actions`] - Header validation, bundling, templates and watching
//! - [`auth`] - Local server capturing authentication artifacts
//! - [`cli`] - Command-line interface, registry and router
//! - [`config`] - Tool configuration loading
//! - [`error`] - Error types and result aliases
//! - [`gateway`] - Uploads to the content gateway
//! - [`shell`] - External command execution
//! - [`ui`] - Prompts, spinners, and terminal output
//! - [`workspace`] - Workspace discovery, paths and settings
//!
//! # Example
//!
//! ```
//! use getlit::cli::{default_registry, resolve, Resolution};
//!
//! let registry = default_registry().unwrap();
//! match resolve(&registry, Some("biuld")).unwrap() {
//!     Resolution::Similar(descriptor) => assert_eq!(descriptor.name, "build"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

pub mod actions;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod shell;
pub mod ui;
pub mod workspace;

pub use error::{GetlitError, Result};
