//! Watch command implementation.
//!
//! The `getlit watch` command rebuilds whenever an action source changes
//! and, when given an action, re-runs its test after each rebuild. Build
//! and test failures are reported and the loop keeps going.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::actions::{build_workspace, discover_sources, Bundler, EsbuildBundler, SourceWatcher};
use crate::cli::args::WatchArgs;
use crate::cli::registry::{CommandContext, CommandResult};
use crate::error::{GetlitError, Result};
use crate::workspace::{locate_workspace, require_credentials, WorkspacePaths};

use super::test::run_action_test;
use super::Command;

/// What each rebuild covers.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WatchPlan<'n> {
    /// Rebuild only this action.
    pub only: Option<&'n str>,
    /// Run this action's test after a successful rebuild.
    pub test: Option<&'n str>,
}

/// The watch command implementation.
pub struct WatchCommand {
    args: WatchArgs,
}

impl WatchCommand {
    /// Get the command arguments.
    pub fn args(&self) -> &WatchArgs {
        &self.args
    }
}

impl Command for WatchCommand {
    type Args = WatchArgs;
    const NAME: &'static str = "watch";

    fn new(args: WatchArgs) -> Self {
        Self { args }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let paths = locate_workspace(ctx.search_root, ctx.config)?;
        require_credentials(&paths.config_file)?;

        let layout = ctx.config.action_layout()?;
        if !has_artifacts(&paths.output_dir, &layout.out_file_ext)? {
            ctx.ui.warning("Run `getlit build` before watching");
            return Err(GetlitError::ArtifactNotFound {
                kind: "Build output".to_string(),
                path: paths.output_dir.clone(),
            });
        }

        let test = self
            .args
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(name) = test {
            discover_sources(&paths, &layout, Some(name))?;
        }

        let plan = WatchPlan { only: None, test };
        watch_sources(ctx, &paths, &plan)
    }
}

/// Whether `dir` holds at least one file ending in `suffix`.
pub(crate) fn has_artifacts(dir: &Path, suffix: &str) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    let entries = fs::read_dir(dir).map_err(|e| GetlitError::filesystem(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| GetlitError::filesystem(dir, e))?;
        let is_artifact = entry.file_name().to_string_lossy().ends_with(suffix)
            && entry.path().is_file();
        if is_artifact {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Block, rebuilding on every batch of source changes.
pub(crate) fn watch_sources(
    ctx: &mut CommandContext<'_>,
    paths: &WorkspacePaths,
    plan: &WatchPlan<'_>,
) -> Result<CommandResult> {
    let layout = ctx.config.action_layout()?;
    let debounce = Duration::from_millis(ctx.config.watch.debounce_ms);
    let watcher = SourceWatcher::new(&paths.source_dir, &layout.in_file_ext, debounce)?;
    let bundler = EsbuildBundler::from_config(ctx.config);

    ctx.ui.message(&format!(
        "Watching {} for changes (Ctrl+C to stop)",
        paths.source_dir.display()
    ));

    while let Some(changed) = watcher.next_change() {
        rebuild(ctx, paths, plan, &bundler, &changed);
    }

    Ok(CommandResult::success())
}

/// One rebuild cycle. Failures are reported, never returned.
pub(crate) fn rebuild(
    ctx: &mut CommandContext<'_>,
    paths: &WorkspacePaths,
    plan: &WatchPlan<'_>,
    bundler: &dyn Bundler,
    changed: &[PathBuf],
) {
    for path in changed {
        ctx.ui.message(&format!("Changed: {}", path.display()));
    }

    match build_workspace(paths, ctx.config, plan.only, bundler, ctx.ui) {
        Ok(report) => ctx
            .ui
            .success(&format!("Rebuilt {} action(s)", report.built.len())),
        Err(e) => {
            ctx.ui.error(&e.to_string());
            return;
        }
    }

    if let Some(name) = plan.test {
        match run_action_test(ctx.config, paths, name, ctx.ui) {
            Ok(()) => ctx.ui.success(&format!("Test for {} passed", name)),
            Err(e) => ctx.ui.error(&e.to_string()),
        }
    }
}
