//! State transition logic
//!
//! Pure functions that apply a requested action to an authoritative record.
//! Inputs are never mutated. The status check runs before the actor check,
//! so a request from the wrong status is reported as an illegal transition
//! whoever sends it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{InsituError, Result};
use crate::schemas::{
    kinds, AssignmentStatus, Delivery, DeliveryStatus, NewNotification, RequestStatus, Role,
    UserProfile, WarehouseRequest, WorkAssignment,
};

use super::actions::{AssignmentAction, DeliveryAction, RequestAction};
use super::authorization::{
    authorize_assignment_action, authorize_delivery_action, authorize_request_action, Actor,
};
use super::states::Lifecycle;

/// Inputs a transition needs beyond the record itself
#[derive(Debug, Clone)]
pub struct TransitionContext {
    /// Clock reading stamped into timestamps set by the transition
    pub now: DateTime<Utc>,

    /// Profile of the transporter chosen for an assign action
    pub assignee: Option<UserProfile>,
}

impl TransitionContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        TransitionContext { now, assignee: None }
    }

    pub fn with_assignee(mut self, assignee: Option<UserProfile>) -> Self {
        self.assignee = assignee;
        self
    }
}

impl Default for TransitionContext {
    fn default() -> Self {
        TransitionContext::at(Utc::now())
    }
}

/// An authorized mutation: the record to write plus advisory notifications
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T> {
    /// The record with updated status, timestamps and references
    pub next: T,

    /// Notifications to send after `next` is written
    pub notifications: Vec<NewNotification>,
}

impl<T> Transition<T> {
    fn silent(next: T) -> Self {
        Transition {
            next,
            notifications: Vec::new(),
        }
    }

    fn notify(next: T, notification: NewNotification) -> Self {
        Transition {
            next,
            notifications: vec![notification],
        }
    }
}

fn illegal<S: std::fmt::Display>(entity: &str, from: S, to: S) -> InsituError {
    InsituError::InvalidTransition(format!("cannot move {} from {} to {}", entity, from, to))
}

/// Apply a delivery action.
///
/// # Errors
/// * `InvalidTransition` - The delivery is not in the action's source status
/// * `Forbidden` - The actor may not perform the action on this delivery
/// * `NotFound` - An assign action without a transporter profile
/// * `Validation` - An assign action naming a profile that is not a transporter
pub fn apply_delivery_action(
    actor: &Actor,
    delivery: &Delivery,
    action: DeliveryAction,
    ctx: &TransitionContext,
) -> Result<Transition<Delivery>> {
    let target = action.target();
    if delivery.status != action.source() || !delivery.status.can_transition_to(target) {
        return Err(illegal("delivery", delivery.status, target));
    }

    authorize_delivery_action(actor, delivery, action)?;

    let now = ctx.now;
    let next = delivery.clone().with_status(target, now);

    match action {
        DeliveryAction::Assign => {
            let transporter = ctx
                .assignee
                .as_ref()
                .ok_or_else(|| InsituError::NotFound("transporter profile".to_string()))?;
            if transporter.role != Role::Transporter {
                return Err(InsituError::Validation(format!(
                    "{} is a {}, not a transporter",
                    transporter.id, transporter.role
                )));
            }

            let mut next = next;
            next.assigned_to = Some(transporter.id);
            let notification = NewNotification::new(
                transporter.id,
                kinds::DELIVERY_ASSIGNED,
                "New delivery assigned",
                format!("You have been assigned the delivery: {}", delivery.title),
            )
            .for_delivery(delivery.id);
            Ok(Transition::notify(next, notification))
        }
        DeliveryAction::StartTransit => {
            let mut next = next;
            next.started_at = Some(now);
            let notification = NewNotification::new(
                delivery.created_by,
                kinds::DELIVERY_IN_TRANSIT,
                "Delivery in transit",
                format!("The delivery {} is on its way", delivery.title),
            )
            .for_delivery(delivery.id);
            Ok(Transition::notify(next, notification))
        }
        DeliveryAction::MarkDelivered => {
            let notification = NewNotification::new(
                delivery.created_by,
                kinds::DELIVERY_DELIVERED,
                "Delivery delivered",
                format!("The delivery {} has been delivered", delivery.title),
            )
            .for_delivery(delivery.id);
            Ok(Transition::notify(next, notification))
        }
        DeliveryAction::Complete => {
            let mut next = next;
            next.completed_date = Some(now);
            Ok(Transition::silent(next))
        }
    }
}

/// Apply a warehouse request action.
///
/// Approve and reject stamp `approved_by`/`approved_at`; complete stamps
/// `completed_at`. The requester is notified of every change.
pub fn apply_request_action(
    actor: &Actor,
    request: &WarehouseRequest,
    action: RequestAction,
    ctx: &TransitionContext,
) -> Result<Transition<WarehouseRequest>> {
    let target = action.target();
    if request.status != action.source() || !request.status.can_transition_to(target) {
        return Err(illegal("warehouse request", request.status, target));
    }

    authorize_request_action(actor, action)?;

    let now = ctx.now;
    let mut next = request.clone().with_status(target, now);
    match target {
        RequestStatus::Approved | RequestStatus::Rejected => {
            next.approved_by = Some(actor.id);
            next.approved_at = Some(now);
        }
        RequestStatus::Completed => next.completed_at = Some(now),
        RequestStatus::Pending => {}
    }

    let notification = NewNotification::new(
        request.requested_by,
        kinds::REQUEST_UPDATE,
        "Warehouse request updated",
        format!("Your request {} is now {}", request.title, target),
    );
    Ok(Transition::notify(next, notification))
}

/// Apply a work assignment action.
///
/// Start stamps `actual_start`; complete stamps `actual_end` and
/// `completed_date`. Cancel is open to the creator and the assignee while
/// the assignment is pending or in progress.
pub fn apply_assignment_action(
    actor: &Actor,
    assignment: &WorkAssignment,
    action: AssignmentAction,
    ctx: &TransitionContext,
) -> Result<Transition<WorkAssignment>> {
    let target = action.target();
    if !assignment.status.can_transition_to(target) {
        return Err(illegal("work assignment", assignment.status, target));
    }

    authorize_assignment_action(actor, assignment, action)?;

    let now = ctx.now;
    let mut next = assignment.clone().with_status(target, now);
    match target {
        AssignmentStatus::InProgress => next.actual_start = Some(now),
        AssignmentStatus::Completed => {
            next.actual_end = Some(now);
            next.completed_date = Some(now);
        }
        AssignmentStatus::Cancelled | AssignmentStatus::Pending => {}
    }
    Ok(Transition::silent(next))
}

/// Delivery actions the actor could perform right now.
///
/// Assign is listed for officers even though the transporter is chosen later.
pub fn permitted_delivery_actions(actor: &Actor, delivery: &Delivery) -> Vec<DeliveryAction> {
    super::actions::DELIVERY_ACTIONS
        .iter()
        .copied()
        .filter(|action| delivery.status == action.source())
        .filter(|action| authorize_delivery_action(actor, delivery, *action).is_ok())
        .collect()
}

pub fn permitted_request_actions(actor: &Actor, request: &WarehouseRequest) -> Vec<RequestAction> {
    super::actions::REQUEST_ACTIONS
        .iter()
        .copied()
        .filter(|action| request.status == action.source())
        .filter(|action| authorize_request_action(actor, *action).is_ok())
        .collect()
}

pub fn permitted_assignment_actions(actor: &Actor, assignment: &WorkAssignment) -> Vec<AssignmentAction> {
    super::actions::ASSIGNMENT_ACTIONS
        .iter()
        .copied()
        .filter(|action| assignment.status.can_transition_to(action.target()))
        .filter(|action| authorize_assignment_action(actor, assignment, *action).is_ok())
        .collect()
}

/// Legal next actions for each loaded record, keyed by record id.
///
/// Records the actor can do nothing with are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PermittedActions {
    pub deliveries: BTreeMap<Uuid, Vec<DeliveryAction>>,
    pub requests: BTreeMap<Uuid, Vec<RequestAction>>,
    pub assignments: BTreeMap<Uuid, Vec<AssignmentAction>>,
}

fn keyed<R, A>(records: &[R], id: impl Fn(&R) -> Uuid, actions: impl Fn(&R) -> Vec<A>) -> BTreeMap<Uuid, Vec<A>> {
    records
        .iter()
        .map(|r| (id(r), actions(r)))
        .filter(|(_, a)| !a.is_empty())
        .collect()
}

impl PermittedActions {
    pub fn compute(
        actor: &Actor,
        deliveries: &[Delivery],
        requests: &[WarehouseRequest],
        assignments: &[WorkAssignment],
    ) -> Self {
        PermittedActions {
            deliveries: keyed(deliveries, |d| d.id, |d| permitted_delivery_actions(actor, d)),
            requests: keyed(requests, |r| r.id, |r| permitted_request_actions(actor, r)),
            assignments: keyed(assignments, |a| a.id, |a| permitted_assignment_actions(actor, a)),
        }
    }

    pub fn for_delivery(&self, id: Uuid) -> &[DeliveryAction] {
        self.deliveries.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn for_request(&self, id: Uuid) -> &[RequestAction] {
        self.requests.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn for_assignment(&self, id: Uuid) -> &[AssignmentAction] {
        self.assignments.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// True when the delivery's timestamps agree with its status
pub fn delivery_timestamps_consistent(delivery: &Delivery) -> bool {
    (delivery.completed_date.is_some() == (delivery.status == DeliveryStatus::Completed))
        && (delivery.assigned_to.is_some() || delivery.status == DeliveryStatus::Pending)
}

/// True when the assignment's timestamps agree with its status
pub fn assignment_timestamps_consistent(assignment: &WorkAssignment) -> bool {
    let completed = assignment.status == AssignmentStatus::Completed;
    assignment.actual_end.is_some() == completed
        && assignment.completed_date.is_some() == completed
        && (assignment.actual_start.is_some()
            == matches!(assignment.status, AssignmentStatus::InProgress | AssignmentStatus::Completed)
            || assignment.status == AssignmentStatus::Cancelled)
}
