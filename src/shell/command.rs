//! External command execution.
//!
//! Programs are spawned directly with an argument vector, never through a
//! shell, so file paths with spaces reach the tool intact.

use crate::error::{GetlitError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of running an external program.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Captured stderr, falling back to stdout, trimmed.
    pub fn diagnostics(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

/// Run `program` with `args` and wait for it to exit.
///
/// A non-zero exit is reported through [`CommandResult::success`]; only a
/// failure to start the program is an error.
pub fn execute(program: &str, args: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(if options.capture_stdout {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    cmd.stderr(if options.capture_stderr {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });

    tracing::debug!("Running {} {}", program, args.join(" "));

    let output = cmd.output().map_err(|e| {
        tracing::debug!("Failed to start {}: {}", program, e);
        GetlitError::CommandFailed {
            command: program.to_string(),
            code: None,
        }
    })?;

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout,
        stderr,
        duration: start.elapsed(),
        success: output.status.success(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn captured() -> CommandOptions {
        CommandOptions {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn execute_successful_command() {
        let result = execute("sh", &sh("echo hello"), &captured()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute("sh", &sh("echo broken >&2; exit 3"), &captured()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.diagnostics(), "broken");
    }

    #[test]
    fn execute_with_env() {
        let mut options = captured();
        options
            .env
            .insert("GETLIT_TEST_VAR".to_string(), "test_value".to_string());

        let result = execute("sh", &sh("echo $GETLIT_TEST_VAR"), &options).unwrap();

        assert!(result.stdout.contains("test_value"));
    }

    #[test]
    fn execute_with_cwd() {
        let temp = TempDir::new().unwrap();
        let mut options = captured();
        options.cwd = Some(temp.path().to_path_buf());

        let result = execute("pwd", &[], &options).unwrap();

        let canonical = temp.path().canonicalize().unwrap();
        assert_eq!(PathBuf::from(result.stdout.trim()).canonicalize().unwrap(), canonical);
    }

    #[test]
    fn arguments_are_not_split() {
        let args = vec!["-c".to_string(), "echo \"$0\"".to_string(), "a b".to_string()];
        let result = execute("sh", &args, &captured()).unwrap();
        assert_eq!(result.stdout.trim(), "a b");
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = execute("getlit-no-such-program", &[], &captured()).unwrap_err();
        assert!(matches!(err, GetlitError::CommandFailed { code: None, .. }));
    }

    #[test]
    fn diagnostics_fall_back_to_stdout() {
        let result = execute("sh", &sh("echo only-stdout; exit 1"), &captured()).unwrap();
        assert_eq!(result.diagnostics(), "only-stdout");
    }
}
