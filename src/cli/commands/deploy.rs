//! Deploy command implementation.
//!
//! The `getlit deploy` command uploads an action's TypeScript source, links
//! it from the built artifact's header, uploads the artifact and appends
//! the resulting hash to the workspace deploy log.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};

use crate::actions::insert_header_line;
use crate::cli::args::DeployArgs;
use crate::cli::registry::{CommandContext, CommandResult};
use crate::config::ToolConfig;
use crate::error::{GetlitError, Result};
use crate::gateway::{HttpUploader, Uploader};
use crate::ui::UserInterface;
use crate::workspace::{locate_workspace, require_credentials, WorkspacePaths};

use super::{select_action, validate_action_name, Command};

/// The deploy command implementation.
pub struct DeployCommand {
    args: DeployArgs,
}

impl DeployCommand {
    /// Get the command arguments.
    pub fn args(&self) -> &DeployArgs {
        &self.args
    }
}

impl Command for DeployCommand {
    type Args = DeployArgs;
    const NAME: &'static str = "deploy";

    fn new(args: DeployArgs) -> Self {
        Self { args }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let paths = locate_workspace(ctx.search_root, ctx.config)?;
        require_credentials(&paths.config_file)?;

        let layout = ctx.config.action_layout()?;
        let name = select_action(ctx, &paths, &layout, self.args.name.as_deref(), "deploy")?;

        let uploader = HttpUploader::from_config(ctx.config)?;
        let deployment = deploy_action(ctx.config, &paths, &name, &uploader, ctx.ui)?;

        ctx.ui
            .success(&format!("Action deployed at {}", deployment.url));
        Ok(CommandResult::success())
    }
}

/// Outcome of a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Hash of the uploaded TypeScript source.
    pub source_hash: String,
    /// Hash of the uploaded artifact.
    pub artifact_hash: String,
    /// Public URL of the artifact.
    pub url: String,
}

/// Upload action `name` and record it in the deploy log.
///
/// The artifact on disk is not modified; only the uploaded copy carries
/// the source link.
pub fn deploy_action(
    config: &ToolConfig,
    paths: &WorkspacePaths,
    name: &str,
    uploader: &dyn Uploader,
    ui: &mut dyn UserInterface,
) -> Result<Deployment> {
    let name = validate_action_name(name)?;
    let layout = config.action_layout()?;
    let artifact = paths.output_dir.join(layout.artifact_file(name));
    let source = paths.source_dir.join(layout.source_file(name));

    let artifact_code = read_existing(&artifact, "Action file")?;
    let source_code = read_existing(&source, "Action source")?;
    let content_url = &config.gateway.content_url;

    let mut spinner = ui.start_spinner(&format!("Uploading {}", source.display()));
    let source_hash = match uploader.upload(&source_code) {
        Ok(hash) => hash,
        Err(e) => {
            spinner.finish_error("Source upload failed");
            return Err(e);
        }
    };
    spinner.set_message(&format!("Uploading {}", artifact.display()));

    let linked = insert_header_line(
        &artifact_code,
        &format!("TYPESCRIPT SOURCE: {}{}", content_url, source_hash),
    );
    let artifact_hash = match uploader.upload(&linked) {
        Ok(hash) => hash,
        Err(e) => {
            spinner.finish_error("Artifact upload failed");
            return Err(e);
        }
    };
    spinner.finish_success(&format!("Uploaded {}", name));

    append_deploy_log(&paths.deploy_log(), name, &artifact_hash)?;

    Ok(Deployment {
        url: format!("{}{}", content_url, artifact_hash),
        source_hash,
        artifact_hash,
    })
}

fn read_existing(path: &Path, kind: &str) -> Result<String> {
    if !path.is_file() {
        return Err(GetlitError::ArtifactNotFound {
            kind: kind.to_string(),
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|e| GetlitError::filesystem(path, e))
}

/// Append `<timestamp> <name> <hash>` to the deploy log.
fn append_deploy_log(log: &Path, name: &str, hash: &str) -> Result<()> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log)
        .map_err(|e| GetlitError::filesystem(log, e))?;
    writeln!(file, "{} {} {}", timestamp, name, hash).map_err(|e| GetlitError::filesystem(log, e))?;
    tracing::debug!("Logged deployment of {} to {}", name, log.display());
    Ok(())
}
