//! Status machine definitions
//!
//! Deliveries follow a linear progression:
//! pending → assigned → in_transit → delivered → completed
//!
//! Warehouse requests branch once (pending → approved | rejected) and
//! approved requests close as completed. Work assignments run
//! pending → in_progress → completed and may be cancelled while still open.

use crate::schemas::{AssignmentStatus, DeliveryStatus, RequestStatus};

/// The canonical ordering of delivery statuses.
///
/// This is the source of truth for delivery ordering; no transition retreats.
pub const DELIVERY_STATES: &[DeliveryStatus] = &[
    DeliveryStatus::Pending,
    DeliveryStatus::Assigned,
    DeliveryStatus::InTransit,
    DeliveryStatus::Delivered,
    DeliveryStatus::Completed,
];

pub const REQUEST_STATES: &[RequestStatus] = &[
    RequestStatus::Pending,
    RequestStatus::Approved,
    RequestStatus::Rejected,
    RequestStatus::Completed,
];

pub const ASSIGNMENT_STATES: &[AssignmentStatus] = &[
    AssignmentStatus::Pending,
    AssignmentStatus::InProgress,
    AssignmentStatus::Completed,
    AssignmentStatus::Cancelled,
];

/// A closed set of statuses with a fixed transition table.
pub trait Lifecycle: Copy + Eq + std::fmt::Display + 'static {
    /// Every status, in declaration order
    const STATES: &'static [Self];

    /// Statuses reachable in one step
    fn allowed_next(self) -> &'static [Self];

    fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    fn can_transition_to(self, target: Self) -> bool {
        self.allowed_next().contains(&target)
    }
}

impl Lifecycle for DeliveryStatus {
    const STATES: &'static [Self] = DELIVERY_STATES;

    fn allowed_next(self) -> &'static [Self] {
        match self {
            DeliveryStatus::Pending => &[DeliveryStatus::Assigned],
            DeliveryStatus::Assigned => &[DeliveryStatus::InTransit],
            DeliveryStatus::InTransit => &[DeliveryStatus::Delivered],
            DeliveryStatus::Delivered => &[DeliveryStatus::Completed],
            DeliveryStatus::Completed => &[],
        }
    }
}

impl Lifecycle for RequestStatus {
    const STATES: &'static [Self] = REQUEST_STATES;

    fn allowed_next(self) -> &'static [Self] {
        match self {
            RequestStatus::Pending => &[RequestStatus::Approved, RequestStatus::Rejected],
            RequestStatus::Approved => &[RequestStatus::Completed],
            RequestStatus::Rejected | RequestStatus::Completed => &[],
        }
    }
}

impl Lifecycle for AssignmentStatus {
    const STATES: &'static [Self] = ASSIGNMENT_STATES;

    fn allowed_next(self) -> &'static [Self] {
        match self {
            AssignmentStatus::Pending => &[AssignmentStatus::InProgress, AssignmentStatus::Cancelled],
            AssignmentStatus::InProgress => &[AssignmentStatus::Completed, AssignmentStatus::Cancelled],
            AssignmentStatus::Completed | AssignmentStatus::Cancelled => &[],
        }
    }
}

/// Get the 0-based index of a delivery status in the progression.
///
/// Returns the position in DELIVERY_STATES, or usize::MAX if not found.
pub fn get_state_index(status: DeliveryStatus) -> usize {
    DELIVERY_STATES
        .iter()
        .position(|&s| s == status)
        .unwrap_or(usize::MAX)
}

/// Returns the next delivery status, or None for completed.
pub fn get_next_state(current: DeliveryStatus) -> Option<DeliveryStatus> {
    let index = get_state_index(current);
    if index >= DELIVERY_STATES.len() - 1 {
        return None;
    }
    Some(DELIVERY_STATES[index + 1])
}

/// Returns the allowed next statuses for any lifecycle as a Vec.
pub fn get_allowed_next_states<S: Lifecycle>(current: S) -> Vec<S> {
    current.allowed_next().to_vec()
}

/// Check if a status is terminal
pub fn is_terminal_state<S: Lifecycle>(status: S) -> bool {
    status.is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_states_order() {
        assert_eq!(DELIVERY_STATES.len(), 5);
        assert_eq!(DELIVERY_STATES[0], DeliveryStatus::Pending);
        assert_eq!(DELIVERY_STATES[1], DeliveryStatus::Assigned);
        assert_eq!(DELIVERY_STATES[2], DeliveryStatus::InTransit);
        assert_eq!(DELIVERY_STATES[3], DeliveryStatus::Delivered);
        assert_eq!(DELIVERY_STATES[4], DeliveryStatus::Completed);
    }

    #[test]
    fn test_get_state_index() {
        assert_eq!(get_state_index(DeliveryStatus::Pending), 0);
        assert_eq!(get_state_index(DeliveryStatus::InTransit), 2);
        assert_eq!(get_state_index(DeliveryStatus::Completed), 4);
    }

    #[test]
    fn test_get_next_state() {
        assert_eq!(get_next_state(DeliveryStatus::Pending), Some(DeliveryStatus::Assigned));
        assert_eq!(get_next_state(DeliveryStatus::Assigned), Some(DeliveryStatus::InTransit));
        assert_eq!(get_next_state(DeliveryStatus::InTransit), Some(DeliveryStatus::Delivered));
        assert_eq!(get_next_state(DeliveryStatus::Delivered), Some(DeliveryStatus::Completed));
        assert_eq!(get_next_state(DeliveryStatus::Completed), None);
    }

    #[test]
    fn test_delivery_table_matches_linear_order() {
        for status in DELIVERY_STATES {
            let expected: Vec<DeliveryStatus> = get_next_state(*status).into_iter().collect();
            assert_eq!(get_allowed_next_states(*status), expected);
        }
    }

    #[test]
    fn test_request_branches() {
        assert_eq!(
            get_allowed_next_states(RequestStatus::Pending),
            vec![RequestStatus::Approved, RequestStatus::Rejected]
        );
        assert!(RequestStatus::Approved.can_transition_to(RequestStatus::Completed));
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Completed));
        assert!(!RequestStatus::Rejected.can_transition_to(RequestStatus::Approved));
    }

    #[test]
    fn test_assignment_cancellation_only_while_open() {
        assert!(AssignmentStatus::Pending.can_transition_to(AssignmentStatus::Cancelled));
        assert!(AssignmentStatus::InProgress.can_transition_to(AssignmentStatus::Cancelled));
        assert!(!AssignmentStatus::Completed.can_transition_to(AssignmentStatus::Cancelled));
        assert!(!AssignmentStatus::Pending.can_transition_to(AssignmentStatus::Completed));
    }

    #[test]
    fn test_is_terminal_state() {
        assert!(!is_terminal_state(DeliveryStatus::Delivered));
        assert!(is_terminal_state(DeliveryStatus::Completed));
        assert!(is_terminal_state(RequestStatus::Rejected));
        assert!(is_terminal_state(RequestStatus::Completed));
        assert!(is_terminal_state(AssignmentStatus::Cancelled));
        assert!(!is_terminal_state(AssignmentStatus::InProgress));
    }
}
