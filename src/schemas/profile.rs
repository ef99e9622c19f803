//! User profile schema - roles and permission levels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AssignmentType;

/// Role assigned to a user at sign-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Supervises the warehouse, assigns and closes deliveries
    WarehouseOfficer,
    /// Drives deliveries assigned to them
    Transporter,
    /// Owns work sites and files warehouse requests
    SiteManager,
    /// Operates machinery on assignment
    MachineryOperator,
    /// Supports loading, logistics and signaling on assignment
    LogisticsLaborer,
}

/// Every role, in declaration order
pub const ALL_ROLES: &[Role] = &[
    Role::WarehouseOfficer,
    Role::Transporter,
    Role::SiteManager,
    Role::MachineryOperator,
    Role::LogisticsLaborer,
];

/// Roles that may be the assignee of a work assignment
pub const WORKER_ROLES: &[Role] = &[Role::MachineryOperator, Role::LogisticsLaborer];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::WarehouseOfficer => "warehouse_officer",
            Role::Transporter => "transporter",
            Role::SiteManager => "site_manager",
            Role::MachineryOperator => "machinery_operator",
            Role::LogisticsLaborer => "logistics_laborer",
        }
    }

    /// True for machinery operators and logistics laborers
    pub fn is_worker(&self) -> bool {
        WORKER_ROLES.contains(self)
    }

    /// Assignment type used when a worker of this role is assigned to a delivery.
    ///
    /// Returns None for roles that cannot hold work assignments.
    pub fn default_assignment_type(&self) -> Option<AssignmentType> {
        match self {
            Role::MachineryOperator => Some(AssignmentType::Machinery),
            Role::LogisticsLaborer => Some(AssignmentType::Logistics),
            _ => None,
        }
    }

    /// Safety requirements pre-filled for a worker of this role
    pub fn default_safety_requirements(&self) -> &'static str {
        match self {
            Role::MachineryOperator => {
                "Mandatory hard hat, safety harness and high-visibility vest. Verify operator certification."
            }
            Role::LogisticsLaborer => {
                "Mandatory hard hat, high-visibility vest and work gloves. Keep radio communication."
            }
            _ => "Follow standard safety protocols.",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warehouse_officer" => Ok(Role::WarehouseOfficer),
            "transporter" => Ok(Role::Transporter),
            "site_manager" => Ok(Role::SiteManager),
            "machinery_operator" => Ok(Role::MachineryOperator),
            "logistics_laborer" => Ok(Role::LogisticsLaborer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Permission level carried on a profile.
///
/// Recorded for completeness; authorization decisions are role-based only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Admin,
    #[default]
    Normal,
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionLevel::Admin => write!(f, "admin"),
            PermissionLevel::Normal => write!(f, "normal"),
        }
    }
}

impl std::str::FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(PermissionLevel::Admin),
            "normal" => Ok(PermissionLevel::Normal),
            _ => Err(format!("Unknown permission level: {}", s)),
        }
    }
}

/// Profile row mirrored from the identity provider into the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub permission_level: PermissionLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a profile with normal permissions
    pub fn new(id: Uuid, email: impl Into<String>, full_name: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        UserProfile {
            id,
            email: email.into(),
            full_name: full_name.into(),
            role,
            permission_level: PermissionLevel::Normal,
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_permission_level(mut self, level: PermissionLevel) -> Self {
        self.permission_level = level;
        self
    }
}
