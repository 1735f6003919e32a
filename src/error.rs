//! Error types for getlit operations.
//!
//! This module defines [`GetlitError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Workspace and registry failures have dedicated variants so callers can
//!   present candidates, missing keys and colliding tokens to the user
//! - Handler failures (bundler, validation, upload) keep the underlying
//!   message intact
//! - Use `anyhow::Error` (via `GetlitError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for getlit operations.
#[derive(Debug, Error)]
pub enum GetlitError {
    /// A path could not be read during a workspace search.
    #[error("Cannot read {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No directory with the workspace name exists under the search root.
    #[error("No '{name}' project found. Run `getlit init` to create one.")]
    NoWorkspaceFound { name: String },

    /// More than one directory carries the workspace name.
    #[error(
        "Found {} '{name}' projects, remove the extra directories and try again:\n{}",
        candidates.len(),
        format_candidates(candidates)
    )]
    AmbiguousWorkspace {
        name: String,
        candidates: Vec<PathBuf>,
    },

    /// A required configuration key is absent or empty.
    #[error("Missing configuration property: {field}")]
    Configuration { field: String },

    /// Two command descriptors claim the same name or alias.
    #[error("Command token '{token}' is claimed by both '{first}' and '{second}'")]
    DuplicateCommandToken {
        token: String,
        first: String,
        second: String,
    },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a JSON configuration or settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The workspace settings lack the authentication artifacts.
    #[error(
        "Configuration at {path} is missing authSig or pkpPublicKey. Run `getlit setup` to fix it."
    )]
    MissingCredentials { path: PathBuf },

    /// An action source carries an invalid metadata header.
    #[error("Invalid metadata in {}:\n{}", file.display(), format_list(errors))]
    MetadataInvalid { file: PathBuf, errors: Vec<String> },

    /// One or more actions failed to bundle.
    #[error("Build failed for {} action(s):\n{}", failures.len(), format_failures(failures))]
    BuildFailed { failures: Vec<(PathBuf, String)> },

    /// A file the command operates on does not exist.
    #[error("{kind} does not exist at {}", path.display())]
    ArtifactNotFound { kind: String, path: PathBuf },

    /// The upload gateway rejected or failed the request.
    #[error("Upload failed: {message}")]
    UploadFailed { message: String },

    /// A subprocess failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// `init` found an existing project.
    #[error("Project has already been initialised in this directory => {}", path.display())]
    ProjectExists { path: PathBuf },

    /// Command arguments could not be parsed.
    #[error("{message}")]
    Usage { message: String },

    /// The filesystem watcher failed.
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GetlitError {
    /// Wrap an IO error with the path that produced it.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Build a missing-configuration error for a JSON key.
    pub fn missing_config(field: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
        }
    }
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, path)| format!("  {}: {}", i + 1, path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_failures(failures: &[(PathBuf, String)]) -> String {
    failures
        .iter()
        .map(|(path, message)| format!("  - {}: {}", path.display(), message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type alias for getlit operations.
pub type Result<T> = std::result::Result<T, GetlitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_workspace_lists_every_candidate() {
        let err = GetlitError::AmbiguousWorkspace {
            name: "myproj".into(),
            candidates: vec![PathBuf::from("/a/myproj"), PathBuf::from("/b/myproj")],
        };
        let msg = err.to_string();
        assert!(msg.contains("Found 2 'myproj' projects"));
        assert!(msg.contains("1: /a/myproj"));
        assert!(msg.contains("2: /b/myproj"));
    }

    #[test]
    fn no_workspace_suggests_init() {
        let err = GetlitError::NoWorkspaceFound {
            name: "lit_actions".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("lit_actions"));
        assert!(msg.contains("getlit init"));
    }

    #[test]
    fn configuration_error_names_field() {
        let err = GetlitError::missing_config("buildConfig.srcDir");
        assert!(err.to_string().contains("buildConfig.srcDir"));
    }

    #[test]
    fn duplicate_token_names_both_owners() {
        let err = GetlitError::DuplicateCommandToken {
            token: "dev".into(),
            first: "watch".into(),
            second: "serve".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'dev'"));
        assert!(msg.contains("'watch'"));
        assert!(msg.contains("'serve'"));
    }

    #[test]
    fn metadata_invalid_lists_errors() {
        let err = GetlitError::MetadataInvalid {
            file: PathBuf::from("src/foo.action.ts"),
            errors: vec!["\"VAR\" is a required property".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("src/foo.action.ts"));
        assert!(msg.contains("  - \"VAR\" is a required property"));
    }

    #[test]
    fn build_failed_lists_each_file() {
        let err = GetlitError::BuildFailed {
            failures: vec![
                (PathBuf::from("a.action.ts"), "syntax error".into()),
                (PathBuf::from("b.action.ts"), "missing import".into()),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 action(s)"));
        assert!(msg.contains("a.action.ts: syntax error"));
        assert!(msg.contains("b.action.ts: missing import"));
    }

    #[test]
    fn filesystem_error_keeps_path_and_source() {
        let err = GetlitError::filesystem(
            "/nope",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/nope"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: GetlitError = io_err.into();
        assert!(matches!(err, GetlitError::Io(_)));
    }
}
