//! Configuration loading with defaults

use std::path::Path;

use crate::errors::{InsituError, Result};
use crate::fs;
use crate::schemas::Config;

/// Load configuration from the workspace, falling back to defaults.
///
/// If config.json exists, it will be read and merged with defaults.
/// If it doesn't exist, default configuration is returned.
pub fn load_config(root: &Path) -> Result<Config> {
    let config = fs::read_config(root)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.store_file.trim().is_empty() {
        return Err(InsituError::ConfigError("store_file must not be empty".to_string()));
    }
    if config.images.max_bytes == 0 {
        return Err(InsituError::ConfigError("images.max_bytes must be positive".to_string()));
    }
    if let Some(bad) = config.images.allowed_types.iter().find(|t| !t.starts_with("image/")) {
        return Err(InsituError::ConfigError(format!(
            "images.allowed_types contains a non-image type: {}",
            bad
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::StoreBackend;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults() {
        let temp = TempDir::new().unwrap();
        std_fs::create_dir(temp.path().join(".insitu")).unwrap();

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.store, StoreBackend::Json);
        assert_eq!(config.limits.deliveries, 50);
        assert_eq!(config.images.max_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().unwrap();
        let insitu_dir = temp.path().join(".insitu");
        std_fs::create_dir(&insitu_dir).unwrap();

        let config_content = r#"{
            "store": "memory",
            "public_base_url": "https://cdn.example.com/requests",
            "limits": {"requests": 5}
        }"#;
        std_fs::write(insitu_dir.join("config.json"), config_content).unwrap();

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.public_base_url, "https://cdn.example.com/requests");
        assert_eq!(config.limits.requests, 5);
        // Default for unspecified field
        assert_eq!(config.limits.deliveries, 50);
    }

    #[test]
    fn test_load_config_rejects_non_image_types() {
        let temp = TempDir::new().unwrap();
        let insitu_dir = temp.path().join(".insitu");
        std_fs::create_dir(&insitu_dir).unwrap();
        std_fs::write(
            insitu_dir.join("config.json"),
            r#"{"images": {"allowed_types": ["application/pdf"]}}"#,
        )
        .unwrap();

        let err = load_config(temp.path()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
