//! Path resolution utilities for insitu
//!
//! Provides functions to locate the workspace root and construct paths
//! to the files kept under `.insitu`.

use std::path::{Path, PathBuf};

use crate::errors::{InsituError, Result};
use crate::schemas::Config;

/// Find the workspace root containing an .insitu directory.
///
/// Walks up the directory tree from the starting directory.
///
/// # Errors
/// * `WorkspaceNotFound` - If no ancestor holds an .insitu directory
pub fn find_workspace_root(start_cwd: &Path) -> Result<PathBuf> {
    let mut current = start_cwd
        .canonicalize()
        .map_err(|e| InsituError::WorkspaceNotFound(format!("Cannot resolve path: {}", e)))?;

    loop {
        if get_insitu_dir(&current).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(InsituError::WorkspaceNotFound(
                    "Could not find an .insitu directory; run `insitu init` first".to_string(),
                ));
            }
        }
    }
}

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Get the path to the .insitu directory.
pub fn get_insitu_dir(root: &Path) -> PathBuf {
    root.join(".insitu")
}

/// Get the path to the config.json file.
pub fn get_config_path(root: &Path) -> PathBuf {
    get_insitu_dir(root).join("config.json")
}

/// Get the path to the identity provider's account file.
pub fn get_identity_path(root: &Path) -> PathBuf {
    get_insitu_dir(root).join("identity.json")
}

/// Get the path to the JSON record store.
pub fn get_store_path(root: &Path, config: &Config) -> PathBuf {
    get_insitu_dir(root).join(&config.store_file)
}

/// Get the directory uploaded objects are written to.
pub fn get_objects_dir(root: &Path, config: &Config) -> PathBuf {
    get_insitu_dir(root).join(&config.objects_dir)
}
