//! Object-storage collaborator for request reference images

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::errors::{InsituError, Result};

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store the bytes under a relative path and return their public URL
    async fn upload(&self, bytes: Vec<u8>, suggested_path: &str, content_type: &str) -> Result<String>;
}

/// Writes objects below a local directory
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        LocalObjectStorage {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Accept only plain relative paths that stay inside the storage root
fn checked_relative(suggested: &str) -> Result<PathBuf> {
    let path = Path::new(suggested);
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => {
                return Err(InsituError::Validation(format!(
                    "object path must be relative and stay inside the bucket: {}",
                    suggested
                )))
            }
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(InsituError::Validation("object path is empty".to_string()));
    }
    Ok(clean)
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(&self, bytes: Vec<u8>, suggested_path: &str, content_type: &str) -> Result<String> {
        let relative = checked_relative(suggested_path)?;
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(InsituError::upstream)?;
        }
        tokio::fs::write(&target, &bytes).await.map_err(InsituError::upstream)?;

        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let url = format!("{}/{}", self.public_base_url.trim_end_matches('/'), key);
        info!(path = %target.display(), content_type, size = bytes.len(), "Stored object");
        Ok(url)
    }
}
