//! Work site schema - construction sites owned by a site manager

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSite {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning site manager
    pub site_manager_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkSite {
    pub fn new(name: impl Into<String>, address: impl Into<String>, site_manager_id: Uuid) -> Self {
        let now = Utc::now();
        WorkSite {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            description: None,
            site_manager_id,
            created_at: now,
            updated_at: now,
        }
    }
}
