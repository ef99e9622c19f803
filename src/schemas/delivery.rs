//! Delivery schema - The main logistics record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Created, waiting for a transporter
    Pending,
    /// Transporter chosen
    Assigned,
    /// Transporter is on the road
    InTransit,
    /// Dropped off at the destination
    Delivered,
    /// Confirmed by the warehouse
    Completed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Assigned => "assigned",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DeliveryStatus::Pending),
            "assigned" => Ok(DeliveryStatus::Assigned),
            "in_transit" => Ok(DeliveryStatus::InTransit),
            "delivered" => Ok(DeliveryStatus::Delivered),
            "completed" => Ok(DeliveryStatus::Completed),
            _ => Err(format!("Unknown delivery status: {}", s)),
        }
    }
}

/// A delivery of construction materials to a destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub delivery_address: String,

    pub status: DeliveryStatus,

    /// Profile that created the delivery
    pub created_by: Uuid,

    /// Transporter, set when the delivery moves to assigned
    #[serde(default)]
    pub assigned_to: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_site_id: Option<Uuid>,

    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,

    /// Set when the delivery enters in_transit
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    /// Set exactly when the delivery is completed
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Delivery {
    /// Create a pending delivery
    pub fn new(title: impl Into<String>, delivery_address: impl Into<String>, created_by: Uuid) -> Self {
        let now = Utc::now();
        Delivery {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            delivery_address: delivery_address.into(),
            status: DeliveryStatus::Pending,
            created_by,
            assigned_to: None,
            work_site_id: None,
            scheduled_date: None,
            started_at: None,
            completed_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_scheduled_date(mut self, scheduled_date: Option<DateTime<Utc>>) -> Self {
        self.scheduled_date = scheduled_date;
        self
    }

    pub fn with_work_site(mut self, work_site_id: Option<Uuid>) -> Self {
        self.work_site_id = work_site_id;
        self
    }

    /// Return a new Delivery with the given status, stamping `updated_at`
    pub fn with_status(mut self, status: DeliveryStatus, now: DateTime<Utc>) -> Self {
        self.status = status;
        self.updated_at = now;
        self
    }

    /// True when the delivery counts towards the pending figure
    pub fn is_open(&self) -> bool {
        matches!(self.status, DeliveryStatus::Pending | DeliveryStatus::Assigned)
    }

    /// True when the given profile is the assigned transporter
    pub fn is_assigned_to(&self, profile_id: Uuid) -> bool {
        self.assigned_to == Some(profile_id)
    }
}
