//! Worker-assignment batch planning
//!
//! Assigning personnel to a delivery produces one work assignment and one
//! notification per selected worker. Planning is pure: every check runs here,
//! before the caller writes anything.

use chrono::{DateTime, Utc};

use crate::errors::{InsituError, Result};
use crate::schemas::{kinds, Delivery, NewNotification, UserProfile, WorkAssignment};

use super::authorization::{authorize_worker_batch, Actor};
use super::visibility::can_view_delivery;

/// One selected worker and the per-worker texts
#[derive(Debug, Clone)]
pub struct WorkerSelection {
    pub worker: UserProfile,

    pub special_instructions: Option<String>,

    /// Falls back to the role's default safety text when blank
    pub safety_requirements: Option<String>,
}

impl WorkerSelection {
    pub fn new(worker: UserProfile) -> Self {
        WorkerSelection {
            worker,
            special_instructions: None,
            safety_requirements: None,
        }
    }
}

/// Task text shared by every assignment in the batch
#[derive(Debug, Clone, Default)]
pub struct TaskBrief {
    /// Replaces the generated "<task> - <delivery>" title when set
    pub title: Option<String>,

    pub description: Option<String>,
}

/// Records to write for a batch
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerBatchPlan {
    pub assignments: Vec<WorkAssignment>,

    /// One per assignment, same order
    pub notifications: Vec<NewNotification>,
}

impl WorkerBatchPlan {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

fn non_blank(text: &Option<String>) -> Option<String> {
    text.as_ref()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Plan the assignments and notifications for a worker batch.
///
/// # Errors
/// * `Forbidden` - The requester is not a warehouse officer or site manager,
///   or cannot see the delivery
/// * `Validation` - A selected profile is not a worker, or appears twice
pub fn plan_worker_assignment(
    actor: &Actor,
    delivery: &Delivery,
    brief: &TaskBrief,
    selections: &[WorkerSelection],
    now: DateTime<Utc>,
) -> Result<WorkerBatchPlan> {
    authorize_worker_batch(actor)?;
    if !can_view_delivery(actor, delivery) {
        return Err(InsituError::Forbidden(format!(
            "delivery {} is not visible to {}",
            delivery.id, actor.id
        )));
    }

    for (i, selection) in selections.iter().enumerate() {
        let worker = &selection.worker;
        if !worker.role.is_worker() {
            return Err(InsituError::Validation(format!(
                "{} ({}) is a {} and cannot take work assignments",
                worker.full_name, worker.id, worker.role
            )));
        }
        if selections[..i].iter().any(|s| s.worker.id == worker.id) {
            return Err(InsituError::Validation(format!(
                "{} is selected more than once",
                worker.id
            )));
        }
    }

    let mut plan = WorkerBatchPlan {
        assignments: Vec::with_capacity(selections.len()),
        notifications: Vec::with_capacity(selections.len()),
    };

    for selection in selections {
        let worker = &selection.worker;
        let Some(assignment_type) = worker.role.default_assignment_type() else {
            continue;
        };

        let title = non_blank(&brief.title)
            .unwrap_or_else(|| format!("{} - {}", assignment_type.task_label(), delivery.title));
        let description = non_blank(&brief.description).or_else(|| {
            Some(format!(
                "{} for: {}",
                assignment_type.task_label(),
                delivery.description.as_deref().unwrap_or(&delivery.title)
            ))
        });
        let safety = non_blank(&selection.safety_requirements)
            .unwrap_or_else(|| worker.role.default_safety_requirements().to_string());

        let mut assignment = WorkAssignment::new(title.clone(), worker.id, assignment_type, actor.id);
        assignment.description = description;
        assignment.delivery_id = Some(delivery.id);
        assignment.work_site_id = delivery.work_site_id;
        assignment.special_instructions = non_blank(&selection.special_instructions);
        assignment.safety_requirements = Some(safety);
        assignment.created_at = now;
        assignment.updated_at = now;

        let notification = NewNotification::new(
            worker.id,
            kinds::WORK_ASSIGNMENT,
            "New work assignment",
            format!("You have been assigned a new task: {}", title),
        )
        .for_delivery(delivery.id);

        plan.assignments.push(assignment);
        plan.notifications.push(notification);
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{AssignmentStatus, AssignmentType, Role};
    use uuid::Uuid;

    fn worker(role: Role) -> UserProfile {
        UserProfile::new(Uuid::new_v4(), "w@example.com", "Worker", role)
    }

    fn delivery() -> Delivery {
        Delivery::new("Steel beams", "Tower B", Uuid::new_v4()).with_description(Some("Unload beams".into()))
    }

    #[test]
    fn test_plan_creates_one_assignment_and_notification_per_worker() {
        let officer = Actor::new(Uuid::new_v4(), Role::WarehouseOfficer);
        let delivery = delivery();
        let operator = worker(Role::MachineryOperator);
        let laborer = worker(Role::LogisticsLaborer);
        let selections = vec![WorkerSelection::new(operator.clone()), WorkerSelection::new(laborer.clone())];

        let plan = plan_worker_assignment(&officer, &delivery, &TaskBrief::default(), &selections, Utc::now())
            .unwrap();

        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.notifications.len(), 2);

        let crane = &plan.assignments[0];
        assert_eq!(crane.assigned_to, operator.id);
        assert_eq!(crane.assignment_type, AssignmentType::Machinery);
        assert_eq!(crane.status, AssignmentStatus::Pending);
        assert_eq!(crane.delivery_id, Some(delivery.id));
        assert_eq!(crane.created_by, officer.id);
        assert_eq!(crane.title, "Machinery operation - Steel beams");
        assert!(crane.safety_requirements.as_deref().unwrap().contains("certification"));

        let support = &plan.assignments[1];
        assert_eq!(support.assignment_type, AssignmentType::Logistics);
        assert!(support.safety_requirements.as_deref().unwrap().contains("radio"));

        assert_eq!(plan.notifications[1].user_id, laborer.id);
        assert_eq!(plan.notifications[1].kind, kinds::WORK_ASSIGNMENT);
        assert_eq!(plan.notifications[1].delivery_id, Some(delivery.id));
    }

    #[test]
    fn test_non_worker_rejected_before_anything_is_planned() {
        let manager = Actor::new(Uuid::new_v4(), Role::SiteManager);
        let own = Delivery::new("Gravel", "Tower B", manager.id);
        let selections = vec![
            WorkerSelection::new(worker(Role::MachineryOperator)),
            WorkerSelection::new(worker(Role::Transporter)),
        ];
        let err = plan_worker_assignment(&manager, &own, &TaskBrief::default(), &selections, Utc::now())
            .unwrap_err();
        assert!(matches!(err, InsituError::Validation(_)));
    }

    #[test]
    fn test_site_manager_cannot_staff_another_managers_delivery() {
        let manager = Actor::new(Uuid::new_v4(), Role::SiteManager);
        let foreign = delivery();
        let selections = vec![WorkerSelection::new(worker(Role::MachineryOperator))];

        let err = plan_worker_assignment(&manager, &foreign, &TaskBrief::default(), &selections, Utc::now())
            .unwrap_err();
        assert!(matches!(err, InsituError::Forbidden(_)));

        let own = Delivery::new("Steel beams", "Tower B", manager.id);
        let plan = plan_worker_assignment(&manager, &own, &TaskBrief::default(), &selections, Utc::now()).unwrap();
        assert_eq!(plan.assignments.len(), 1);
    }

    #[test]
    fn test_transporter_cannot_request_batch() {
        let transporter = Actor::new(Uuid::new_v4(), Role::Transporter);
        let selections = vec![WorkerSelection::new(worker(Role::LogisticsLaborer))];
        let err = plan_worker_assignment(&transporter, &delivery(), &TaskBrief::default(), &selections, Utc::now())
            .unwrap_err();
        assert!(matches!(err, InsituError::Forbidden(_)));
    }

    #[test]
    fn test_duplicate_worker_rejected() {
        let officer = Actor::new(Uuid::new_v4(), Role::WarehouseOfficer);
        let operator = worker(Role::MachineryOperator);
        let selections = vec![WorkerSelection::new(operator.clone()), WorkerSelection::new(operator)];
        assert!(plan_worker_assignment(&officer, &delivery(), &TaskBrief::default(), &selections, Utc::now())
            .is_err());
    }

    #[test]
    fn test_custom_texts_override_defaults() {
        let officer = Actor::new(Uuid::new_v4(), Role::WarehouseOfficer);
        let mut selection = WorkerSelection::new(worker(Role::LogisticsLaborer));
        selection.special_instructions = Some("Use gate 3".into());
        selection.safety_requirements = Some("Ear protection".into());
        let brief = TaskBrief {
            title: Some("Unload beams".into()),
            description: None,
        };

        let plan = plan_worker_assignment(&officer, &delivery(), &brief, &[selection], Utc::now()).unwrap();
        let assignment = &plan.assignments[0];
        assert_eq!(assignment.title, "Unload beams");
        assert_eq!(assignment.special_instructions.as_deref(), Some("Use gate 3"));
        assert_eq!(assignment.safety_requirements.as_deref(), Some("Ear protection"));
    }

    #[test]
    fn test_blank_safety_falls_back_to_role_default() {
        let officer = Actor::new(Uuid::new_v4(), Role::WarehouseOfficer);
        let mut selection = WorkerSelection::new(worker(Role::MachineryOperator));
        selection.safety_requirements = Some("   ".into());
        let plan =
            plan_worker_assignment(&officer, &delivery(), &TaskBrief::default(), &[selection], Utc::now()).unwrap();
        assert_eq!(
            plan.assignments[0].safety_requirements.as_deref(),
            Some(Role::MachineryOperator.default_safety_requirements())
        );
    }

    #[test]
    fn test_empty_selection_is_empty_plan() {
        let officer = Actor::new(Uuid::new_v4(), Role::WarehouseOfficer);
        let plan = plan_worker_assignment(&officer, &delivery(), &TaskBrief::default(), &[], Utc::now()).unwrap();
        assert!(plan.is_empty());
        assert!(plan.notifications.is_empty());
    }
}
