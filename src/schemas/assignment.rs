//! Work assignment schema - tasks handed to machinery operators and laborers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a work assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AssignmentStatus::Pending),
            "in_progress" => Ok(AssignmentStatus::InProgress),
            "completed" => Ok(AssignmentStatus::Completed),
            "cancelled" => Ok(AssignmentStatus::Cancelled),
            _ => Err(format!("Unknown assignment status: {}", s)),
        }
    }
}

/// Kind of work requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    Machinery,
    Logistics,
    Loading,
    Signaling,
}

impl AssignmentType {
    /// Human-readable task label used in generated titles
    pub fn task_label(&self) -> &'static str {
        match self {
            AssignmentType::Machinery => "Machinery operation",
            AssignmentType::Logistics => "Logistics support",
            AssignmentType::Loading => "Loading",
            AssignmentType::Signaling => "Signaling",
        }
    }
}

impl std::fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentType::Machinery => write!(f, "machinery"),
            AssignmentType::Logistics => write!(f, "logistics"),
            AssignmentType::Loading => write!(f, "loading"),
            AssignmentType::Signaling => write!(f, "signaling"),
        }
    }
}

impl std::str::FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "machinery" => Ok(AssignmentType::Machinery),
            "logistics" => Ok(AssignmentType::Logistics),
            "loading" => Ok(AssignmentType::Loading),
            "signaling" => Ok(AssignmentType::Signaling),
            _ => Err(format!("Unknown assignment type: {}", s)),
        }
    }
}

/// Priority of a work assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A unit of work handed to one worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkAssignment {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Machinery operator or logistics laborer
    pub assigned_to: Uuid,
    #[serde(default)]
    pub delivery_id: Option<Uuid>,
    #[serde(default)]
    pub work_site_id: Option<Uuid>,
    pub assignment_type: AssignmentType,
    #[serde(default)]
    pub priority: Priority,
    pub status: AssignmentStatus,
    #[serde(default)]
    pub scheduled_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_end: Option<DateTime<Utc>>,
    /// Set on entering in_progress
    #[serde(default)]
    pub actual_start: Option<DateTime<Utc>>,
    /// Set on entering completed
    #[serde(default)]
    pub actual_end: Option<DateTime<Utc>>,
    /// Set on entering completed
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub equipment_needed: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub safety_requirements: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkAssignment {
    pub fn new(
        title: impl Into<String>,
        assigned_to: Uuid,
        assignment_type: AssignmentType,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        WorkAssignment {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            assigned_to,
            delivery_id: None,
            work_site_id: None,
            assignment_type,
            priority: Priority::Normal,
            status: AssignmentStatus::Pending,
            scheduled_start: None,
            scheduled_end: None,
            actual_start: None,
            actual_end: None,
            completed_date: None,
            equipment_needed: None,
            special_instructions: None,
            safety_requirements: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: AssignmentStatus, now: DateTime<Utc>) -> Self {
        self.status = status;
        self.updated_at = now;
        self
    }

    /// Pending or in progress
    pub fn is_active(&self) -> bool {
        matches!(self.status, AssignmentStatus::Pending | AssignmentStatus::InProgress)
    }
}
