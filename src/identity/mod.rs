//! Identity collaborator
//!
//! Sign-up, sign-in and the current session. Profiles live in the record
//! store; `ensure_profile` is the single place a session gets its backing row.

mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::errors::Result;
use crate::schemas::{Role, UserProfile};
use crate::store::{fetch_by_id, upsert_record, RecordStore};

pub use local::LocalIdentity;

/// Name given to profiles created without sign-up metadata
pub const FALLBACK_FULL_NAME: &str = "User";

/// Metadata captured at sign-up and carried as session claims
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpData {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    #[serde(default)]
    pub claims: SignUpData,
    pub signed_in_at: DateTime<Utc>,
}

/// Pushed to subscribers whenever the session changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Uuid),
    SignedOut,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register an account and return its user id. Does not sign in.
    async fn sign_up(&self, email: &str, password: &str, data: SignUpData) -> Result<Uuid>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    async fn current_session(&self) -> Result<Option<Session>>;

    async fn sign_out(&self) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Return the session's profile row, creating it from the session claims
/// when it does not exist yet.
///
/// An existing row is returned unchanged.
pub async fn ensure_profile(store: &dyn RecordStore, session: &Session) -> Result<UserProfile> {
    if let Some(profile) = fetch_by_id::<UserProfile>(store, session.user_id).await? {
        return Ok(profile);
    }

    let full_name = session
        .claims
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_FULL_NAME);
    let role = session.claims.role.unwrap_or(Role::Transporter);

    let profile = UserProfile::new(session.user_id, session.email.clone(), full_name, role);
    let written = upsert_record(store, &profile).await?;
    info!(user_id = %written.id, role = %written.role, "Created missing profile");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::PermissionLevel;
    use crate::store::{fetch_records, MemoryStore, Query};

    fn session(claims: SignUpData) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            claims,
            signed_in_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ensure_profile_creates_from_claims() {
        let store = MemoryStore::new();
        let session = session(SignUpData {
            full_name: Some("Ana Ruiz".into()),
            role: Some(Role::SiteManager),
        });

        let profile = ensure_profile(&store, &session).await.unwrap();
        assert_eq!(profile.id, session.user_id);
        assert_eq!(profile.full_name, "Ana Ruiz");
        assert_eq!(profile.role, Role::SiteManager);
    }

    #[tokio::test]
    async fn test_ensure_profile_falls_back_to_defaults() {
        let store = MemoryStore::new();
        let profile = ensure_profile(&store, &session(SignUpData::default())).await.unwrap();
        assert_eq!(profile.full_name, FALLBACK_FULL_NAME);
        assert_eq!(profile.role, Role::Transporter);
        assert_eq!(profile.permission_level, PermissionLevel::Normal);
    }

    #[tokio::test]
    async fn test_ensure_profile_is_idempotent() {
        let store = MemoryStore::new();
        let session = session(SignUpData {
            full_name: Some("Ana".into()),
            role: Some(Role::WarehouseOfficer),
        });

        let first = ensure_profile(&store, &session).await.unwrap();

        let mut later = session.clone();
        later.claims.role = Some(Role::Transporter);
        let second = ensure_profile(&store, &later).await.unwrap();

        assert_eq!(first, second);
        let all: Vec<UserProfile> = fetch_records(&store, &Query::new()).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
