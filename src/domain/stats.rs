//! Dashboard counters derived from the loaded record sets

use serde::{Deserialize, Serialize};

use crate::schemas::{Delivery, DeliveryStatus, Notification, WorkAssignment};

/// Counts over role-scoped records. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_deliveries: usize,
    /// Pending or assigned
    pub pending_deliveries: usize,
    pub completed_deliveries: usize,
    pub unread_notifications: usize,
    /// Pending or in progress
    pub pending_assignments: usize,
}

impl DashboardStats {
    pub fn compute(
        deliveries: &[Delivery],
        notifications: &[Notification],
        assignments: &[WorkAssignment],
    ) -> Self {
        DashboardStats {
            total_deliveries: deliveries.len(),
            pending_deliveries: deliveries.iter().filter(|d| d.is_open()).count(),
            completed_deliveries: deliveries
                .iter()
                .filter(|d| d.status == DeliveryStatus::Completed)
                .count(),
            unread_notifications: notifications.iter().filter(|n| !n.read).count(),
            pending_assignments: assignments.iter().filter(|a| a.is_active()).count(),
        }
    }
}
