//! Workspace resolution.
//!
//! Locates the single project workspace addressed by the search root and
//! derives its layout:
//!
//! - [`finder`] - depth-bounded discovery and single-match resolution
//! - [`paths`] - source, output, test and settings paths from configuration
//! - [`settings`] - the per-workspace settings file and credential gate
//!
//! # Example
//!
//! ```
//! use getlit::config::load_default_config;
//! use getlit::workspace::locate_workspace;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! std::fs::create_dir_all(temp.path().join("lit_actions/src")).unwrap();
//!
//! let config = load_default_config().unwrap();
//! let paths = locate_workspace(temp.path(), &config).unwrap();
//! assert_eq!(paths.source_dir, temp.path().join("lit_actions/src"));
//! ```

pub mod finder;
pub mod paths;
pub mod settings;

use std::path::Path;

use crate::config::ToolConfig;
use crate::error::Result;

pub use finder::{find_workspace_dirs, resolve_workspace};
pub use paths::{derive_workspace_paths, WorkspacePaths};
pub use settings::{require_credentials, Credentials, ProjectSettings};

/// Find, resolve and lay out the workspace under `search_root`.
pub fn locate_workspace(search_root: &Path, config: &ToolConfig) -> Result<WorkspacePaths> {
    let name = config.project_name()?;
    let candidates = find_workspace_dirs(search_root, name, config.search_depth)?;
    let root = resolve_workspace(name, candidates)?;
    tracing::debug!("Active workspace: {}", root.display());
    derive_workspace_paths(&root, config)
}
