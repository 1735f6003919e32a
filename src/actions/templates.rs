//! Templates embedded at compile time.

use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir, DirEntry};

use crate::error::{GetlitError, Result};

/// Embedded templates directory.
static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Project scaffolds live under this directory, one per template name.
const PROJECT_ROOT: &str = "project";

/// Action source template; `placeholder` is replaced by the action name.
pub const ACTION_TEMPLATE: &str = "action/template.action.ts";

/// Action test template.
pub const ACTION_TEST_TEMPLATE: &str = "action/template.t.action.mjs";

/// Token replaced by the action name in [`ACTION_TEMPLATE`].
pub const PLACEHOLDER: &str = "placeholder";

/// Contents of an embedded text file.
pub fn embedded_text(path: &str) -> Result<&'static str> {
    let file = TEMPLATES_DIR
        .get_file(path)
        .ok_or_else(|| GetlitError::ArtifactNotFound {
            kind: "Template".to_string(),
            path: PathBuf::from("templates").join(path),
        })?;

    file.contents_utf8()
        .ok_or_else(|| GetlitError::ConfigParseError {
            path: PathBuf::from("templates").join(path),
            message: "Invalid UTF-8".to_string(),
        })
}

/// Names of the embedded project templates.
pub fn project_templates() -> Vec<String> {
    TEMPLATES_DIR
        .get_dir(PROJECT_ROOT)
        .map(|root| {
            root.dirs()
                .filter_map(|d| d.path().file_name())
                .map(|n| n.to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Copy the project template `name` into `dest`, creating it.
///
/// Returns the files written, relative to `dest`.
pub fn install_project(name: &str, dest: &Path) -> Result<Vec<PathBuf>> {
    let template_root = format!("{}/{}", PROJECT_ROOT, name);
    let dir = TEMPLATES_DIR
        .get_dir(&template_root)
        .ok_or_else(|| GetlitError::ArtifactNotFound {
            kind: "Template".to_string(),
            path: PathBuf::from("templates").join(&template_root),
        })?;

    fs::create_dir_all(dest).map_err(|e| GetlitError::filesystem(dest, e))?;

    let mut written = Vec::new();
    copy_dir(dir, dir.path(), dest, &mut written)?;
    written.sort();
    Ok(written)
}

fn copy_dir(dir: &Dir<'_>, base: &Path, dest: &Path, written: &mut Vec<PathBuf>) -> Result<()> {
    for entry in dir.entries() {
        let relative = entry
            .path()
            .strip_prefix(base)
            .map_err(|e| anyhow::anyhow!("template path outside its root: {}", e))?;
        let target = dest.join(relative);

        match entry {
            DirEntry::Dir(sub) => {
                fs::create_dir_all(&target).map_err(|e| GetlitError::filesystem(&target, e))?;
                copy_dir(sub, base, dest, written)?;
            }
            DirEntry::File(file) => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|e| GetlitError::filesystem(parent, e))?;
                }
                fs::write(&target, file.contents())
                    .map_err(|e| GetlitError::filesystem(&target, e))?;
                written.push(relative.to_path_buf());
            }
        }
    }
    Ok(())
}

/// Action source for `name`.
pub fn render_action(name: &str) -> Result<String> {
    Ok(embedded_text(ACTION_TEMPLATE)?.replace(PLACEHOLDER, name))
}

/// Test script for a new action.
pub fn render_action_test() -> Result<String> {
    Ok(embedded_text(ACTION_TEST_TEMPLATE)?.to_string())
}
