//! Bundling action sources into deployable artifacts.

use std::path::PathBuf;

use crate::config::ToolConfig;
use crate::error::{GetlitError, Result};
use crate::shell::{execute, CommandOptions};

/// One bundling job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// Action source file.
    pub entry: PathBuf,
    /// Artifact to produce.
    pub outfile: PathBuf,
    /// Global variable the bundle is assigned to.
    pub global_name: String,
}

/// Produces a bundled artifact from an entry file.
pub trait Bundler {
    /// Bundle `request.entry` into `request.outfile`.
    ///
    /// Returns the written artifact; a compile failure is an error carrying
    /// the bundler's diagnostics.
    fn bundle(&self, request: &BundleRequest) -> Result<PathBuf>;
}

/// Bundler driving the `esbuild` command line.
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    command: String,
}

impl EsbuildBundler {
    /// Use `command` as the esbuild executable.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Use the configured bundler command.
    pub fn from_config(config: &ToolConfig) -> Self {
        Self::new(config.bundler.command.clone())
    }

    /// Arguments passed to esbuild for `request`.
    pub fn arguments(request: &BundleRequest) -> Vec<String> {
        vec![
            request.entry.display().to_string(),
            "--bundle".to_string(),
            format!("--global-name={}", request.global_name),
            format!("--outfile={}", request.outfile.display()),
        ]
    }
}

impl Bundler for EsbuildBundler {
    fn bundle(&self, request: &BundleRequest) -> Result<PathBuf> {
        let options = CommandOptions {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        };

        let result = execute(&self.command, &Self::arguments(request), &options)?;

        if !result.success {
            return Err(GetlitError::CommandFailed {
                command: format!("{}: {}", self.command, result.diagnostics()),
                code: result.exit_code,
            });
        }

        if !request.outfile.is_file() {
            return Err(GetlitError::ArtifactNotFound {
                kind: "Bundle output".to_string(),
                path: request.outfile.clone(),
            });
        }

        Ok(request.outfile.clone())
    }
}
