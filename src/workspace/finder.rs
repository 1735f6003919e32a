//! Workspace discovery.
//!
//! A workspace is a directory whose name equals the configured project name.
//! Discovery walks the search root depth-first up to a depth bound and treats every
//! match as a leaf: workspaces nested inside a workspace are never reported.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GetlitError, Result};

/// Find every directory named `target_name` under `root`.
///
/// Entries are visited in file-name order. Symbolic links are not followed.
/// `max_depth` bounds how many levels below `root` are entered; with a depth
/// of 0 only the direct children of `root` are inspected. A relative `root`
/// is taken against the current directory, so every match is absolute.
///
/// # Errors
///
/// Returns `Filesystem` if `root`, or any directory entered on the way, cannot
/// be read. No partial result is returned.
pub fn find_workspace_dirs(root: &Path, target_name: &str, max_depth: u32) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(root).map_err(|e| GetlitError::filesystem(root, e))?;
    let mut found = Vec::new();
    walk(&root, target_name, max_depth, &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, target_name: &str, depth: u32, found: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| GetlitError::filesystem(dir, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| GetlitError::filesystem(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| GetlitError::filesystem(&path, e))?;

        if !file_type.is_dir() {
            continue;
        }

        if entry.file_name() == target_name {
            tracing::debug!("Found workspace candidate {}", path.display());
            found.push(path);
        } else if depth > 0 {
            walk(&path, target_name, depth - 1, found)?;
        }
    }

    Ok(())
}

/// Pick the single active workspace out of the discovered candidates.
///
/// # Errors
///
/// Returns `NoWorkspaceFound` for zero candidates and `AmbiguousWorkspace`,
/// carrying every candidate, for more than one. Never picks among several.
pub fn resolve_workspace(name: &str, candidates: Vec<PathBuf>) -> Result<PathBuf> {
    let mut candidates = candidates;
    match candidates.len() {
        0 => Err(GetlitError::NoWorkspaceFound {
            name: name.to_string(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(GetlitError::AmbiguousWorkspace {
            name: name.to_string(),
            candidates,
        }),
    }
}
