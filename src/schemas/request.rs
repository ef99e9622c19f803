//! Warehouse request schema - material requests filed by site managers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a warehouse request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "completed" => Ok(RequestStatus::Completed),
            _ => Err(format!("Unknown request status: {}", s)),
        }
    }
}

/// A request for materials from a work site to the warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseRequest {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub status: RequestStatus,
    /// Site manager who filed the request
    pub requested_by: Uuid,
    /// Warehouse officer who approved or rejected it
    #[serde(default)]
    pub approved_by: Option<Uuid>,
    #[serde(default)]
    pub work_site_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WarehouseRequest {
    pub fn new(title: impl Into<String>, quantity: u32, requested_by: Uuid) -> Self {
        let now = Utc::now();
        WarehouseRequest {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            quantity,
            unit: None,
            status: RequestStatus::Pending,
            requested_by,
            approved_by: None,
            work_site_id: None,
            image_url: None,
            approved_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: RequestStatus, now: DateTime<Utc>) -> Self {
        self.status = status;
        self.updated_at = now;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_serialization() {
        assert_eq!(serde_json::to_string(&RequestStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&RequestStatus::Approved).unwrap(), "\"approved\"");
        assert_eq!(serde_json::to_string(&RequestStatus::Rejected).unwrap(), "\"rejected\"");
        assert_eq!(serde_json::to_string(&RequestStatus::Completed).unwrap(), "\"completed\"");
    }

    #[test]
    fn test_new_request_is_pending() {
        let manager = Uuid::new_v4();
        let request = WarehouseRequest::new("Sand", 12, manager);
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.requested_by, manager);
        assert!(request.approved_by.is_none());
        assert!(request.image_url.is_none());
    }

    #[test]
    fn test_negative_quantity_does_not_deserialize() {
        let json = r#"{
            "id": "6f1c1f3e-0000-4000-8000-000000000001",
            "title": "Sand",
            "quantity": -3,
            "status": "pending",
            "requested_by": "6f1c1f3e-0000-4000-8000-000000000002",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        assert!(serde_json::from_str::<WarehouseRequest>(json).is_err());
    }
}
