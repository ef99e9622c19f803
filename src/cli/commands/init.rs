//! Init command - Create an .insitu workspace

use std::path::Path;

use tracing::info;

use crate::errors::{InsituError, Result};
use crate::fs::{get_config_path, get_insitu_dir, resolve_cwd, write_config};
use crate::schemas::Config;

/// Create `.insitu/` with a default config.json under the working directory
pub async fn run(cwd: Option<&Path>, force: bool) -> Result<()> {
    let root = resolve_cwd(cwd);
    let config_path = get_config_path(&root);
    if config_path.exists() && !force {
        return Err(InsituError::ConfigError(format!(
            "{} already exists; use --force to overwrite",
            config_path.display()
        )));
    }

    std::fs::create_dir_all(get_insitu_dir(&root))?;
    write_config(&root, &Config::default())?;
    info!(path = %config_path.display(), "Initialized workspace");
    println!("Initialized insitu workspace in {}", get_insitu_dir(&root).display());
    Ok(())
}
