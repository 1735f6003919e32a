//! User-facing output and prompts.
//!
//! This module provides:
//! - [`UserInterface`] trait, so handlers never print directly
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] capturing every interaction for tests
//!
//! # Example
//!
//! ```
//! use getlit::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("getlit");
//! ui.success("Build successful!");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, GetlitTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a plain message.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every output mode.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for overrides and test responses).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Free-form text input.
    Input,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    String(String),
}

impl PromptResult {
    /// The answer as a string.
    pub fn as_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
        }
    }
}

impl Prompt {
    /// A free-form input prompt.
    pub fn input(key: &str, question: &str, default: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Input,
            default: default.map(String::from),
        }
    }

    /// A single-choice prompt whose labels are its values.
    pub fn select(key: &str, question: &str, values: &[String]) -> Self {
        let options = values
            .iter()
            .map(|v| PromptOption {
                label: v.clone(),
                value: v.clone(),
            })
            .collect();

        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Select { options },
            default: values.first().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_result_as_string() {
        assert_eq!(PromptResult::String("hello".to_string()).as_string(), "hello");
    }

    #[test]
    fn input_prompt_keeps_default() {
        let prompt = Prompt::input("install_dir", "Where?", Some("./"));
        assert!(matches!(prompt.prompt_type, PromptType::Input));
        assert_eq!(prompt.default.as_deref(), Some("./"));
    }

    #[test]
    fn select_prompt_defaults_to_first_value() {
        let values = vec!["foo".to_string(), "bar".to_string()];
        let prompt = Prompt::select("action", "Which action?", &values);

        match &prompt.prompt_type {
            PromptType::Select { options } => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[1].value, "bar");
            }
            other => panic!("Expected Select variant, got {:?}", other),
        }
        assert_eq!(prompt.default.as_deref(), Some("foo"));
    }

    #[test]
    fn select_prompt_without_values_has_no_default() {
        let prompt = Prompt::select("action", "Which action?", &[]);
        assert_eq!(prompt.default, None);
    }
}
