//! File system utilities for insitu
//!
//! Provides path resolution and JSON file operations.

mod json;
mod paths;

pub use json::{read_config, read_json, write_config, write_json};
pub use paths::{
    find_workspace_root, get_config_path, get_identity_path, get_insitu_dir, get_objects_dir,
    get_store_path, resolve_cwd,
};
