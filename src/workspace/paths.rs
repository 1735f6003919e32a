//! Workspace layout derived from configuration.

use std::path::{Path, PathBuf};

use crate::config::{require, ToolConfig};
use crate::error::{GetlitError, Result};

/// Filesystem layout of the active workspace.
///
/// A derived view: recomputed on every invocation, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    /// The workspace directory itself.
    pub root: PathBuf,
    /// Action sources.
    pub source_dir: PathBuf,
    /// Bundled artifacts.
    pub output_dir: PathBuf,
    /// Action test scripts.
    pub test_dir: PathBuf,
    /// Persisted settings (credentials written by `setup`).
    pub config_file: PathBuf,
}

impl WorkspacePaths {
    /// Deploy history appended to by `deploy`.
    pub fn deploy_log(&self) -> PathBuf {
        self.root.join("deploy.log")
    }
}

/// Derive the workspace layout from its root and the configured segments.
///
/// Every required key is checked before any path is built, so a missing key
/// can never resolve to the workspace root itself. Leading and trailing
/// separators on a segment are dropped so each join carries exactly one.
///
/// # Errors
///
/// Returns `Configuration` naming the first absent or empty key.
pub fn derive_workspace_paths(root: &Path, config: &ToolConfig) -> Result<WorkspacePaths> {
    let build = &config.build_config;
    let src = segment(&build.src_dir, "buildConfig.srcDir")?;
    let out = segment(&build.out_dir, "buildConfig.outDir")?;
    let test = segment(&build.test_dir, "buildConfig.testDir")?;
    let config_file = segment(&config.config_file, "configFile")?;

    Ok(WorkspacePaths {
        root: root.to_path_buf(),
        source_dir: root.join(src),
        output_dir: root.join(out),
        test_dir: root.join(test),
        config_file: root.join(config_file),
    })
}

fn segment<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    let trimmed = require(value, field)?.trim_matches(|c| c == '/' || c == '\\');
    if trimmed.is_empty() {
        return Err(GetlitError::missing_config(field));
    }
    Ok(trimmed)
}
