//! Notification schema - advisory messages addressed to one profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known notification type tags. The column is free-form.
pub mod kinds {
    pub const DELIVERY_ASSIGNED: &str = "delivery_assigned";
    pub const DELIVERY_IN_TRANSIT: &str = "delivery_in_transit";
    pub const DELIVERY_DELIVERED: &str = "delivery_delivered";
    pub const WORK_ASSIGNMENT: &str = "work_assignment";
    pub const REQUEST_UPDATE: &str = "request_update";
    pub const SYSTEM: &str = "system";
}

/// A notification row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Recipient
    pub user_id: Uuid,
    #[serde(default)]
    pub delivery_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_site_id: Option<Uuid>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification that has not been written yet.
///
/// Produced by the domain layer as a side effect of transitions; the service
/// layer turns drafts into rows best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: String,
    pub user_id: Uuid,
    pub delivery_id: Option<Uuid>,
}

impl NewNotification {
    pub fn new(
        user_id: Uuid,
        kind: &str,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        NewNotification {
            title: title.into(),
            message: message.into(),
            kind: kind.to_string(),
            user_id,
            delivery_id: None,
        }
    }

    pub fn for_delivery(mut self, delivery_id: Uuid) -> Self {
        self.delivery_id = Some(delivery_id);
        self
    }

    /// Materialize the draft as an unread row
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            title: self.title,
            message: self.message,
            kind: self.kind,
            user_id: self.user_id,
            delivery_id: self.delivery_id,
            work_site_id: None,
            read: false,
            created_at: now,
        }
    }
}
