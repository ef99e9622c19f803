//! Role-gated authorization rules
//!
//! Decisions are role-based. `permission_level` is carried on the actor but
//! never consulted: any warehouse officer may assign a delivery.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{InsituError, Result};
use crate::schemas::{Delivery, Notification, PermissionLevel, Role, UserProfile, WorkAssignment, WorkSite};

use super::actions::{AssignmentAction, DeliveryAction, RequestAction};

/// The authenticated user on whose behalf an action runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub permission_level: PermissionLevel,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Actor {
            id,
            role,
            permission_level: PermissionLevel::Normal,
        }
    }
}

impl From<&UserProfile> for Actor {
    fn from(profile: &UserProfile) -> Self {
        Actor {
            id: profile.id,
            role: profile.role,
            permission_level: profile.permission_level,
        }
    }
}

fn forbidden(actor: &Actor, what: impl std::fmt::Display) -> InsituError {
    InsituError::Forbidden(format!("{} may not {}", actor.role, what))
}

fn require_role(actor: &Actor, allowed: &[Role], what: &str) -> Result<()> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(forbidden(actor, what))
    }
}

/// Warehouse officers and site managers create deliveries
pub fn authorize_create_delivery(actor: &Actor) -> Result<()> {
    require_role(actor, &[Role::WarehouseOfficer, Role::SiteManager], "create deliveries")
}

/// Check the actor against the delivery transition table.
///
/// Only the actor is checked here; the status check belongs to the caller.
pub fn authorize_delivery_action(actor: &Actor, delivery: &Delivery, action: DeliveryAction) -> Result<()> {
    match action {
        DeliveryAction::Assign | DeliveryAction::Complete => {
            require_role(actor, &[Role::WarehouseOfficer], &format!("{} deliveries", action))
        }
        DeliveryAction::StartTransit | DeliveryAction::MarkDelivered => {
            if actor.role == Role::Transporter && delivery.is_assigned_to(actor.id) {
                Ok(())
            } else {
                Err(InsituError::Forbidden(format!(
                    "only the assigned transporter may {} delivery {}",
                    action, delivery.id
                )))
            }
        }
    }
}

/// Only site managers file warehouse requests
pub fn authorize_create_request(actor: &Actor) -> Result<()> {
    require_role(actor, &[Role::SiteManager], "create warehouse requests")
}

/// Only warehouse officers advance warehouse requests
pub fn authorize_request_action(actor: &Actor, action: RequestAction) -> Result<()> {
    require_role(actor, &[Role::WarehouseOfficer], &format!("{} warehouse requests", action))
}

pub fn authorize_create_work_site(actor: &Actor) -> Result<()> {
    require_role(actor, &[Role::SiteManager], "create work sites")
}

/// Only the owning site manager may attach a delivery or request to a work site
pub fn authorize_work_site_use(actor: &Actor, site: &WorkSite) -> Result<()> {
    if site.site_manager_id == actor.id {
        Ok(())
    } else {
        Err(InsituError::Forbidden(format!(
            "work site {} belongs to another site manager",
            site.id
        )))
    }
}

/// Start and complete belong to the assignee; cancel to the creator or the assignee
pub fn authorize_assignment_action(
    actor: &Actor,
    assignment: &WorkAssignment,
    action: AssignmentAction,
) -> Result<()> {
    let is_assignee = assignment.assigned_to == actor.id;
    let allowed = match action {
        AssignmentAction::Start | AssignmentAction::Complete => is_assignee,
        AssignmentAction::Cancel => is_assignee || assignment.created_by == actor.id,
    };
    if allowed {
        Ok(())
    } else {
        Err(InsituError::Forbidden(format!(
            "{} may not {} assignment {}",
            actor.id, action, assignment.id
        )))
    }
}

/// Warehouse officers and site managers assign personnel to deliveries
pub fn authorize_worker_batch(actor: &Actor) -> Result<()> {
    require_role(actor, &[Role::WarehouseOfficer, Role::SiteManager], "assign workers")
}

/// Transporter listings feed delivery assignment
pub fn authorize_list_transporters(actor: &Actor) -> Result<()> {
    require_role(actor, &[Role::WarehouseOfficer], "list transporters")
}

pub fn authorize_list_workers(actor: &Actor) -> Result<()> {
    authorize_worker_batch(actor)
}

/// Notifications are only ever touched by their recipient
pub fn authorize_notification_update(actor: &Actor, notification: &Notification) -> Result<()> {
    if notification.user_id == actor.id {
        Ok(())
    } else {
        Err(InsituError::Forbidden(format!(
            "notification {} belongs to another user",
            notification.id
        )))
    }
}
