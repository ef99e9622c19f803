//! Requested actions and the status edges they traverse

use serde::{Deserialize, Serialize};

use crate::schemas::{AssignmentStatus, DeliveryStatus, RequestStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryAction {
    /// pending → assigned, choosing a transporter
    Assign,
    /// assigned → in_transit
    StartTransit,
    /// in_transit → delivered
    MarkDelivered,
    /// delivered → completed
    Complete,
}

pub const DELIVERY_ACTIONS: &[DeliveryAction] = &[
    DeliveryAction::Assign,
    DeliveryAction::StartTransit,
    DeliveryAction::MarkDelivered,
    DeliveryAction::Complete,
];

impl DeliveryAction {
    pub fn source(&self) -> DeliveryStatus {
        match self {
            DeliveryAction::Assign => DeliveryStatus::Pending,
            DeliveryAction::StartTransit => DeliveryStatus::Assigned,
            DeliveryAction::MarkDelivered => DeliveryStatus::InTransit,
            DeliveryAction::Complete => DeliveryStatus::Delivered,
        }
    }

    pub fn target(&self) -> DeliveryStatus {
        match self {
            DeliveryAction::Assign => DeliveryStatus::Assigned,
            DeliveryAction::StartTransit => DeliveryStatus::InTransit,
            DeliveryAction::MarkDelivered => DeliveryStatus::Delivered,
            DeliveryAction::Complete => DeliveryStatus::Completed,
        }
    }
}

impl std::fmt::Display for DeliveryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryAction::Assign => write!(f, "assign"),
            DeliveryAction::StartTransit => write!(f, "start_transit"),
            DeliveryAction::MarkDelivered => write!(f, "mark_delivered"),
            DeliveryAction::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    Approve,
    Reject,
    Complete,
}

pub const REQUEST_ACTIONS: &[RequestAction] =
    &[RequestAction::Approve, RequestAction::Reject, RequestAction::Complete];

impl RequestAction {
    pub fn source(&self) -> RequestStatus {
        match self {
            RequestAction::Approve | RequestAction::Reject => RequestStatus::Pending,
            RequestAction::Complete => RequestStatus::Approved,
        }
    }

    pub fn target(&self) -> RequestStatus {
        match self {
            RequestAction::Approve => RequestStatus::Approved,
            RequestAction::Reject => RequestStatus::Rejected,
            RequestAction::Complete => RequestStatus::Completed,
        }
    }
}

impl std::fmt::Display for RequestAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestAction::Approve => write!(f, "approve"),
            RequestAction::Reject => write!(f, "reject"),
            RequestAction::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentAction {
    Start,
    Complete,
    Cancel,
}

pub const ASSIGNMENT_ACTIONS: &[AssignmentAction] =
    &[AssignmentAction::Start, AssignmentAction::Complete, AssignmentAction::Cancel];

impl AssignmentAction {
    pub fn target(&self) -> AssignmentStatus {
        match self {
            AssignmentAction::Start => AssignmentStatus::InProgress,
            AssignmentAction::Complete => AssignmentStatus::Completed,
            AssignmentAction::Cancel => AssignmentStatus::Cancelled,
        }
    }
}

impl std::fmt::Display for AssignmentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentAction::Start => write!(f, "start"),
            AssignmentAction::Complete => write!(f, "complete"),
            AssignmentAction::Cancel => write!(f, "cancel"),
        }
    }
}
