//! Role-scoped dashboard tabs

use serde::{Deserialize, Serialize};

use crate::schemas::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Deliveries,
    Assignments,
    Worksites,
    Requests,
    Notifications,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Deliveries => "deliveries",
            Tab::Assignments => "assignments",
            Tab::Worksites => "worksites",
            Tab::Requests => "requests",
            Tab::Notifications => "notifications",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tabs in display order; the first one is the default
pub fn tabs_for(role: Role) -> Vec<Tab> {
    match role {
        Role::MachineryOperator | Role::LogisticsLaborer => vec![Tab::Assignments, Tab::Notifications],
        Role::Transporter => vec![Tab::Deliveries, Tab::Notifications],
        Role::WarehouseOfficer => vec![Tab::Deliveries, Tab::Requests, Tab::Notifications],
        Role::SiteManager => vec![Tab::Deliveries, Tab::Worksites, Tab::Requests, Tab::Notifications],
    }
}

pub fn default_tab(role: Role) -> Tab {
    if role.is_worker() {
        Tab::Assignments
    } else {
        Tab::Deliveries
    }
}
