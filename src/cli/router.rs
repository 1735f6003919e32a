//! Command routing.
//!
//! Maps the first argument to exactly one descriptor. A token that only
//! resembles a command produces a suggestion and runs nothing; a token that
//! resembles nothing falls through to the default command.

use std::path::Path;

use strsim::damerau_levenshtein;

use crate::config::ToolConfig;
use crate::error::Result;
use crate::ui::UserInterface;

use super::registry::{CommandContext, CommandDescriptor, CommandResult, Registry};

/// Exit code returned with a suggestion.
pub const SUGGESTION_EXIT_CODE: i32 = 2;

/// Outcome of looking up a command token.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'r> {
    /// The token is a name or alias.
    Exact(&'r CommandDescriptor),
    /// The token is close to this command; nothing should run.
    Similar(&'r CommandDescriptor),
    /// Nothing matched; run the default command.
    Default(&'r CommandDescriptor),
}

/// Loose form of a token: trimmed, leading dashes removed, lowercased,
/// separators dropped.
pub fn normalize(token: &str) -> String {
    token
        .trim()
        .trim_start_matches('-')
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve `token` (or the default token when absent) against `registry`.
pub fn resolve<'r>(registry: &'r Registry, token: Option<&str>) -> Result<Resolution<'r>> {
    let token = token.unwrap_or_else(|| registry.default_token());

    if let Some(descriptor) = registry.find(token) {
        return Ok(Resolution::Exact(descriptor));
    }

    if let Some(descriptor) = find_similar(registry, token) {
        return Ok(Resolution::Similar(descriptor));
    }

    Ok(Resolution::Default(registry.default_descriptor()?))
}

/// Closest descriptor to an unmatched token.
///
/// Normalized equality wins; otherwise the smallest edit distance within
/// `max(1, len / 3)` of a name or alias, earliest descriptor on ties.
fn find_similar<'r>(registry: &'r Registry, token: &str) -> Option<&'r CommandDescriptor> {
    let wanted = normalize(token);
    if wanted.is_empty() {
        return None;
    }

    let descriptors = registry.descriptors();

    if let Some(found) = descriptors
        .iter()
        .find(|d| d.tokens().any(|t| normalize(t) == wanted))
    {
        return Some(found);
    }

    let mut best: Option<(usize, &CommandDescriptor)> = None;
    for descriptor in descriptors {
        for candidate in descriptor.tokens().map(normalize) {
            let limit = (candidate.chars().count() / 3).max(1);
            let distance = damerau_levenshtein(&wanted, &candidate);
            if distance <= limit && best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, descriptor));
            }
        }
    }

    best.map(|(_, descriptor)| descriptor)
}

/// Route `argv` to a handler and return its outcome.
///
/// Handler errors propagate unchanged.
pub fn dispatch(
    registry: &Registry,
    argv: &[String],
    config: &ToolConfig,
    search_root: &Path,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let token = argv.first().map(String::as_str);
    let rest: &[String] = argv.get(1..).unwrap_or(&[]);

    let (descriptor, args) = match resolve(registry, token)? {
        Resolution::Exact(descriptor) => (descriptor, rest),
        Resolution::Similar(descriptor) => {
            tracing::debug!("'{}' resembles '{}'", token.unwrap_or(""), descriptor.name);
            ui.error(&format!(
                "Command not found. Did you mean \"{}\"?",
                descriptor.name
            ));
            return Ok(CommandResult::failure(SUGGESTION_EXIT_CODE));
        }
        Resolution::Default(descriptor) => {
            tracing::debug!(
                "'{}' matched nothing, running '{}'",
                token.unwrap_or(""),
                descriptor.name
            );
            (descriptor, &[][..])
        }
    };

    tracing::debug!("Dispatching '{}' with {:?}", descriptor.name, args);

    let mut ctx = CommandContext {
        registry,
        config,
        search_root,
        ui,
    };
    (descriptor.handler)(args, &mut ctx)
}
