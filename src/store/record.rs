//! Entity kinds and the mapping from typed records to store rows

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{InsituError, Result};
use crate::schemas::{Delivery, Notification, UserProfile, WarehouseRequest, WorkAssignment, WorkSite};

/// Backend table holding one entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "user_profiles")]
    Profile,
    #[serde(rename = "deliveries")]
    Delivery,
    #[serde(rename = "notifications")]
    Notification,
    #[serde(rename = "warehouse_requests")]
    WarehouseRequest,
    #[serde(rename = "work_assignments")]
    WorkAssignment,
    #[serde(rename = "work_sites")]
    WorkSite,
}

impl EntityKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Profile => "user_profiles",
            EntityKind::Delivery => "deliveries",
            EntityKind::Notification => "notifications",
            EntityKind::WarehouseRequest => "warehouse_requests",
            EntityKind::WorkAssignment => "work_assignments",
            EntityKind::WorkSite => "work_sites",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// A typed record persisted in one table
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn id(&self) -> Uuid;
}

impl Record for UserProfile {
    const KIND: EntityKind = EntityKind::Profile;
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Delivery {
    const KIND: EntityKind = EntityKind::Delivery;
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Notification {
    const KIND: EntityKind = EntityKind::Notification;
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for WarehouseRequest {
    const KIND: EntityKind = EntityKind::WarehouseRequest;
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for WorkAssignment {
    const KIND: EntityKind = EntityKind::WorkAssignment;
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for WorkSite {
    const KIND: EntityKind = EntityKind::WorkSite;
    fn id(&self) -> Uuid {
        self.id
    }
}

pub fn to_row<R: Record>(record: &R) -> Result<Value> {
    Ok(serde_json::to_value(record)?)
}

pub fn from_row<R: Record>(row: Value) -> Result<R> {
    serde_json::from_value(row).map_err(|e| {
        InsituError::InvalidJson(format!("malformed {} row: {}", R::KIND, e))
    })
}
