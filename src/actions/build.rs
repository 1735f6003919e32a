//! The build pipeline.
//!
//! Sources are discovered, every header is validated, and only then is each
//! action bundled, one after another. Bundling failures are collected and
//! reported together once every action has been attempted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ActionLayout, ToolConfig};
use crate::error::{GetlitError, Result};
use crate::ui::UserInterface;
use crate::workspace::WorkspacePaths;

use super::bundler::{BundleRequest, Bundler};
use super::metadata::{ActionMetadata, MetadataSchema};

/// An action source file in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSource {
    /// Action name (file name without the source suffix).
    pub name: String,
    /// Absolute path of the source file.
    pub path: PathBuf,
}

/// A source whose header passed validation.
#[derive(Debug, Clone)]
pub struct PlannedAction {
    pub source: ActionSource,
    pub metadata: ActionMetadata,
}

/// One artifact produced by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArtifact {
    pub name: String,
    pub source: PathBuf,
    pub artifact: PathBuf,
}

/// Outcome of a successful build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub built: Vec<BuiltArtifact>,
}

impl BuildReport {
    /// Whether there was nothing to build.
    pub fn is_empty(&self) -> bool {
        self.built.is_empty()
    }
}

/// List action sources in the source directory, sorted by name.
///
/// With `only`, the list is narrowed to that action, which must exist.
pub fn discover_sources(
    paths: &WorkspacePaths,
    layout: &ActionLayout,
    only: Option<&str>,
) -> Result<Vec<ActionSource>> {
    let dir = &paths.source_dir;
    let entries = fs::read_dir(dir).map_err(|e| GetlitError::filesystem(dir, e))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GetlitError::filesystem(dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| GetlitError::filesystem(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if let Some(name) = layout.action_name(&file_name) {
            sources.push(ActionSource {
                name: name.to_string(),
                path: entry.path(),
            });
        }
    }
    sources.sort_by(|a, b| a.name.cmp(&b.name));

    match only {
        None => Ok(sources),
        Some(wanted) => {
            let selected: Vec<_> = sources.into_iter().filter(|s| s.name == wanted).collect();
            if selected.is_empty() {
                return Err(GetlitError::ArtifactNotFound {
                    kind: "Action source".to_string(),
                    path: dir.join(layout.source_file(wanted)),
                });
            }
            Ok(selected)
        }
    }
}

/// Action names available in the workspace.
pub fn action_names(paths: &WorkspacePaths, layout: &ActionLayout) -> Result<Vec<String>> {
    Ok(discover_sources(paths, layout, None)?
        .into_iter()
        .map(|s| s.name)
        .collect())
}

/// Schema for this workspace: the configured override or the embedded one.
pub fn load_schema(paths: &WorkspacePaths, config: &ToolConfig) -> Result<MetadataSchema> {
    match config.action_schema.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(relative) => MetadataSchema::load(&paths.root.join(relative)),
        None => MetadataSchema::embedded(),
    }
}

/// Extract and validate every header before anything is bundled.
pub fn plan_actions(sources: Vec<ActionSource>, schema: &MetadataSchema) -> Result<Vec<PlannedAction>> {
    let mut planned = Vec::with_capacity(sources.len());

    for source in sources {
        let content =
            fs::read_to_string(&source.path).map_err(|e| GetlitError::filesystem(&source.path, e))?;
        let metadata = schema.extract(&content);
        schema.validate(&source.path, &metadata)?;
        tracing::debug!("Validated {} ({} header keys)", source.name, metadata.len());
        planned.push(PlannedAction { source, metadata });
    }

    Ok(planned)
}

/// Bundle each planned action into the output directory.
///
/// Every action is attempted; the error lists every one that failed.
pub fn bundle_actions(
    planned: &[PlannedAction],
    paths: &WorkspacePaths,
    layout: &ActionLayout,
    bundler: &dyn Bundler,
    ui: &mut dyn UserInterface,
) -> Result<BuildReport> {
    let out_dir = &paths.output_dir;
    fs::create_dir_all(out_dir).map_err(|e| GetlitError::filesystem(out_dir, e))?;

    let mut report = BuildReport::default();
    let mut failures = Vec::new();

    for action in planned {
        let outfile = out_dir.join(layout.artifact_file(&action.source.name));
        let mut spinner = ui.start_spinner(&format!("Bundling {}", action.source.name));

        match bundle_one(action, &outfile, bundler) {
            Ok(()) => {
                spinner.finish_success(&format!(
                    "{} => {}",
                    action.source.path.display(),
                    outfile.display()
                ));
                report.built.push(BuiltArtifact {
                    name: action.source.name.clone(),
                    source: action.source.path.clone(),
                    artifact: outfile,
                });
            }
            Err(e) => {
                spinner.finish_error(&format!("{} failed", action.source.path.display()));
                tracing::debug!("Bundling {} failed: {}", action.source.name, e);
                failures.push((action.source.path.clone(), e.to_string()));
            }
        }
    }

    if failures.is_empty() {
        tracing::info!("Built {} action(s)", report.built.len());
        Ok(report)
    } else {
        Err(GetlitError::BuildFailed { failures })
    }
}

fn bundle_one(action: &PlannedAction, outfile: &Path, bundler: &dyn Bundler) -> Result<()> {
    let global_name = action
        .metadata
        .global_name()
        .ok_or_else(|| GetlitError::MetadataInvalid {
            file: action.source.path.clone(),
            errors: vec!["missing VAR".to_string()],
        })?;

    let request = BundleRequest {
        entry: action.source.path.clone(),
        outfile: outfile.to_path_buf(),
        global_name: global_name.to_string(),
    };
    let artifact = bundler.bundle(&request)?;

    let bundled =
        fs::read_to_string(&artifact).map_err(|e| GetlitError::filesystem(&artifact, e))?;
    let content = format!("{}\n{}", action.metadata.banner(), bundled);
    fs::write(&artifact, content).map_err(|e| GetlitError::filesystem(&artifact, e))?;
    Ok(())
}

/// Discover, validate and bundle the workspace's actions.
pub fn build_workspace(
    paths: &WorkspacePaths,
    config: &ToolConfig,
    only: Option<&str>,
    bundler: &dyn Bundler,
    ui: &mut dyn UserInterface,
) -> Result<BuildReport> {
    let layout = config.action_layout()?;
    let sources = discover_sources(paths, &layout, only)?;
    if sources.is_empty() {
        return Ok(BuildReport::default());
    }

    let schema = load_schema(paths, config)?;
    let planned = plan_actions(sources, &schema)?;
    bundle_actions(&planned, paths, &layout, bundler, ui)
}
