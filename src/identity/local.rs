//! File-backed identity provider
//!
//! Accounts and the current session are kept in `.insitu/identity.json`.
//! Passwords are stored as hex SHA-256 over a per-account salt.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::validate_email;
use crate::errors::{InsituError, Result};
use crate::fs::{read_json, write_json};

use super::{AuthEvent, IdentityProvider, Session, SignUpData};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    id: Uuid,
    email: String,
    salt: String,
    password_hash: String,
    #[serde(default)]
    data: SignUpData,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IdentityFile {
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    session: Option<Session>,
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct LocalIdentity {
    path: PathBuf,
    lock: Mutex<()>,
    events: broadcast::Sender<AuthEvent>,
}

impl LocalIdentity {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(16);
        LocalIdentity {
            path: path.into(),
            lock: Mutex::new(()),
            events,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<IdentityFile> {
        match read_json(&self.path) {
            Ok(file) => Ok(file),
            Err(InsituError::NotFound(_)) => Ok(IdentityFile::default()),
            Err(InsituError::Io(e)) => Err(InsituError::upstream(e)),
            Err(e) => Err(e),
        }
    }

    fn save(&self, file: &IdentityFile) -> Result<()> {
        write_json(&self.path, file).map_err(|e| match e {
            InsituError::Io(e) => InsituError::upstream(e),
            other => other,
        })
    }

    fn announce(&self, event: AuthEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    async fn sign_up(&self, email: &str, password: &str, data: SignUpData) -> Result<Uuid> {
        let email = normalize_email(email);
        validate_email(&email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(InsituError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let _guard = self.lock.lock().await;
        let mut file = self.load()?;
        if file.accounts.iter().any(|a| a.email == email) {
            return Err(InsituError::Validation(format!("{} is already registered", email)));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let account = Account {
            id: Uuid::new_v4(),
            password_hash: hash_password(&salt, password),
            salt,
            email,
            data,
            created_at: Utc::now(),
        };
        let id = account.id;
        info!(user_id = %id, email = %account.email, "Registered account");
        file.accounts.push(account);
        self.save(&file)?;
        Ok(id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let email = normalize_email(email);

        let _guard = self.lock.lock().await;
        let mut file = self.load()?;
        let account = file
            .accounts
            .iter()
            .find(|a| a.email == email && a.password_hash == hash_password(&a.salt, password))
            .ok_or_else(|| InsituError::Forbidden("invalid login credentials".to_string()))?;

        let session = Session {
            user_id: account.id,
            email: account.email.clone(),
            claims: account.data.clone(),
            signed_in_at: Utc::now(),
        };
        file.session = Some(session.clone());
        self.save(&file)?;

        info!(user_id = %session.user_id, "Signed in");
        self.announce(AuthEvent::SignedIn(session.user_id));
        Ok(session)
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        let _guard = self.lock.lock().await;
        let session = self.load()?.session;
        debug!(signed_in = session.is_some(), "Read current session");
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.load()?;
        if file.session.take().is_some() {
            self.save(&file)?;
            info!("Signed out");
        }
        self.announce(AuthEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
