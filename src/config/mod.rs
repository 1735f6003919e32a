//! Tool configuration for getlit.
//!
//! - Schema definitions in [`schema`]
//! - Loading of the embedded default or an override file in [`loader`]
//!
//! # Example
//!
//! ```
//! use getlit::config::load_default_config;
//!
//! let config = load_default_config().unwrap();
//! assert_eq!(config.project_name().unwrap(), "lit_actions");
//! assert_eq!(config.default_command, "help");
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_file, load_default_config, parse_config, DEFAULT_CONFIG};
pub use schema::{
    require, ActionLayout, BuildConfig, BundlerConfig, GatewayConfig, TestRunnerConfig,
    ToolConfig, WatchConfig,
};
