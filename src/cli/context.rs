//! Workspace wiring shared by the commands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::load_config;
use crate::domain::Actor;
use crate::errors::{InsituError, Result};
use crate::fs::{find_workspace_root, get_identity_path, get_objects_dir, get_store_path, resolve_cwd};
use crate::identity::{ensure_profile, IdentityProvider, LocalIdentity};
use crate::schemas::{Config, StoreBackend, UserProfile};
use crate::service::Coordinator;
use crate::storage::LocalObjectStorage;
use crate::store::{JsonFileStore, MemoryStore, RecordStore};

/// An opened workspace: configuration plus the three collaborators
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub identity: LocalIdentity,
    pub coordinator: Coordinator,
}

impl Workspace {
    /// Locate the workspace above `cwd` and open its collaborators
    pub fn open(cwd: Option<&Path>) -> Result<Self> {
        let root = find_workspace_root(&resolve_cwd(cwd))?;
        let config = load_config(&root)?;

        let store: Arc<dyn RecordStore> = match config.store {
            StoreBackend::Json => Arc::new(JsonFileStore::open(get_store_path(&root, &config))),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        let objects = Arc::new(LocalObjectStorage::new(
            get_objects_dir(&root, &config),
            config.public_base_url.clone(),
        ));
        let identity = LocalIdentity::open(get_identity_path(&root));
        debug!(root = %root.display(), store = ?config.store, "Opened workspace");

        Ok(Workspace {
            coordinator: Coordinator::new(store, objects, config.clone()),
            root,
            config,
            identity,
        })
    }

    /// The signed-in user's profile, created on first use
    pub async fn profile(&self) -> Result<UserProfile> {
        let session = self
            .identity
            .current_session()
            .await?
            .ok_or_else(|| InsituError::Forbidden("not signed in; run `insitu login` first".to_string()))?;
        ensure_profile(self.coordinator.store(), &session).await
    }

    pub async fn actor(&self) -> Result<Actor> {
        Ok(Actor::from(&self.profile().await?))
    }
}
