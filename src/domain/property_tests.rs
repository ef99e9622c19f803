//! Property-based tests for domain logic
//!
//! These tests use proptest to verify invariants across many random inputs.

#[cfg(test)]
mod tests {
    use crate::domain::actions::{AssignmentAction, DeliveryAction, ASSIGNMENT_ACTIONS, DELIVERY_ACTIONS};
    use crate::domain::authorization::Actor;
    use crate::domain::batch::{plan_worker_assignment, TaskBrief, WorkerSelection};
    use crate::domain::states::{get_state_index, DELIVERY_STATES};
    use crate::domain::stats::DashboardStats;
    use crate::domain::transitions::{
        apply_assignment_action, apply_delivery_action, assignment_timestamps_consistent,
        delivery_timestamps_consistent, TransitionContext,
    };
    use crate::errors::InsituError;
    use crate::schemas::{
        kinds, AssignmentStatus, AssignmentType, Delivery, DeliveryStatus, NewNotification, Notification, Role,
        UserProfile, WorkAssignment, ALL_ROLES,
    };
    use chrono::Utc;
    use proptest::prelude::*;
    use uuid::Uuid;

    // ===== STRATEGY HELPERS =====

    fn any_delivery_status() -> impl Strategy<Value = DeliveryStatus> {
        prop::sample::select(DELIVERY_STATES.to_vec())
    }

    fn any_assignment_status() -> impl Strategy<Value = AssignmentStatus> {
        prop_oneof![
            Just(AssignmentStatus::Pending),
            Just(AssignmentStatus::InProgress),
            Just(AssignmentStatus::Completed),
            Just(AssignmentStatus::Cancelled),
        ]
    }

    fn any_delivery_action() -> impl Strategy<Value = DeliveryAction> {
        prop::sample::select(DELIVERY_ACTIONS.to_vec())
    }

    fn any_assignment_action() -> impl Strategy<Value = AssignmentAction> {
        prop::sample::select(ASSIGNMENT_ACTIONS.to_vec())
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(ALL_ROLES.to_vec())
    }

    /// The cast of a delivery scenario: officer, assigned transporter,
    /// another transporter, and the creating site manager
    struct Cast {
        officer: Actor,
        transporter: UserProfile,
        other_transporter: Actor,
        manager: Actor,
    }

    impl Cast {
        fn new() -> Self {
            Cast {
                officer: Actor::new(Uuid::new_v4(), Role::WarehouseOfficer),
                transporter: UserProfile::new(Uuid::new_v4(), "t1@example.com", "T1", Role::Transporter),
                other_transporter: Actor::new(Uuid::new_v4(), Role::Transporter),
                manager: Actor::new(Uuid::new_v4(), Role::SiteManager),
            }
        }

        fn pick(&self, index: usize) -> Actor {
            match index % 4 {
                0 => self.officer,
                1 => Actor::from(&self.transporter),
                2 => self.other_transporter,
                _ => self.manager,
            }
        }
    }

    // ===== IMMUTABILITY TESTS =====

    proptest! {
        /// Property: apply_delivery_action never mutates its input
        #[test]
        fn test_apply_delivery_action_never_mutates(
            status in any_delivery_status(),
            action in any_delivery_action(),
            who in 0usize..4
        ) {
            let cast = Cast::new();
            let delivery = Delivery::new("Load", "Site", cast.manager.id).with_status(status, Utc::now());
            let original = delivery.clone();
            let ctx = TransitionContext::default().with_assignee(Some(cast.transporter.clone()));
            let _ = apply_delivery_action(&cast.pick(who), &delivery, action, &ctx);
            prop_assert_eq!(delivery, original);
        }
    }

    // ===== LIFECYCLE TESTS =====

    proptest! {
        /// Property: deliveries only ever advance one step, and timestamps track status
        #[test]
        fn test_delivery_progression_is_linear(
            steps in prop::collection::vec((0usize..4, any_delivery_action()), 0..24)
        ) {
            let cast = Cast::new();
            let mut delivery = Delivery::new("Load", "Site", cast.manager.id);
            let ctx = TransitionContext::default().with_assignee(Some(cast.transporter.clone()));

            for (who, action) in steps {
                let before = get_state_index(delivery.status);
                match apply_delivery_action(&cast.pick(who), &delivery, action, &ctx) {
                    Ok(transition) => {
                        prop_assert_eq!(get_state_index(transition.next.status), before + 1);
                        prop_assert!(delivery_timestamps_consistent(&transition.next));
                        delivery = transition.next;
                    }
                    Err(e) => {
                        prop_assert!(matches!(
                            e,
                            InsituError::Forbidden(_) | InsituError::InvalidTransition(_)
                        ));
                    }
                }
            }
        }

        /// Property: another transporter is always Forbidden on an assigned delivery
        #[test]
        fn test_other_transporter_forbidden(
            status in prop_oneof![Just(DeliveryStatus::Assigned), Just(DeliveryStatus::InTransit)]
        ) {
            let cast = Cast::new();
            let mut delivery = Delivery::new("Load", "Site", cast.manager.id).with_status(status, Utc::now());
            delivery.assigned_to = Some(cast.transporter.id);
            let action = if status == DeliveryStatus::Assigned {
                DeliveryAction::StartTransit
            } else {
                DeliveryAction::MarkDelivered
            };
            let result = apply_delivery_action(&cast.other_transporter, &delivery, action, &TransitionContext::default());
            prop_assert!(matches!(result, Err(InsituError::Forbidden(_))));
        }

        /// Property: assignment timestamps agree with status after any legal sequence
        #[test]
        fn test_assignment_timestamps_track_status(
            steps in prop::collection::vec((0usize..3, any_assignment_action()), 0..12)
        ) {
            let worker = Uuid::new_v4();
            let creator = Uuid::new_v4();
            let actors = [
                Actor::new(worker, Role::LogisticsLaborer),
                Actor::new(creator, Role::WarehouseOfficer),
                Actor::new(Uuid::new_v4(), Role::MachineryOperator),
            ];
            let mut assignment = WorkAssignment::new("Unload", worker, AssignmentType::Logistics, creator);
            let ctx = TransitionContext::default();

            for (who, action) in steps {
                if let Ok(transition) = apply_assignment_action(&actors[who], &assignment, action, &ctx) {
                    prop_assert_eq!(transition.next.status, action.target());
                    prop_assert!(assignment_timestamps_consistent(&transition.next));
                    assignment = transition.next;
                }
            }
        }
    }

    // ===== STATS TESTS =====

    proptest! {
        /// Property: stats are idempotent and pending + completed never exceeds total
        #[test]
        fn test_stats_bounds_and_idempotency(
            delivery_statuses in prop::collection::vec(any_delivery_status(), 0..30),
            reads in prop::collection::vec(any::<bool>(), 0..30),
            assignment_statuses in prop::collection::vec(any_assignment_status(), 0..30)
        ) {
            let now = Utc::now();
            let someone = Uuid::new_v4();
            let deliveries: Vec<Delivery> = delivery_statuses
                .iter()
                .map(|s| Delivery::new("Load", "Site", someone).with_status(*s, now))
                .collect();
            let notifications: Vec<Notification> = reads
                .iter()
                .map(|read| {
                    let mut n = NewNotification::new(someone, kinds::SYSTEM, "t", "m").into_notification(now);
                    n.read = *read;
                    n
                })
                .collect();
            let assignments: Vec<WorkAssignment> = assignment_statuses
                .iter()
                .map(|s| WorkAssignment::new("Task", someone, AssignmentType::Machinery, someone).with_status(*s, now))
                .collect();

            let first = DashboardStats::compute(&deliveries, &notifications, &assignments);
            let second = DashboardStats::compute(&deliveries, &notifications, &assignments);
            prop_assert_eq!(first, second);
            prop_assert!(first.pending_deliveries + first.completed_deliveries <= first.total_deliveries);
            prop_assert_eq!(first.unread_notifications, reads.iter().filter(|r| !**r).count());
            prop_assert!(first.pending_assignments <= assignments.len());
        }
    }

    // ===== BATCH TESTS =====

    proptest! {
        /// Property: N workers yield N assignments and N notifications, or nothing at all
        #[test]
        fn test_batch_is_all_or_nothing(roles in prop::collection::vec(any_role(), 0..8)) {
            let officer = Actor::new(Uuid::new_v4(), Role::WarehouseOfficer);
            let delivery = Delivery::new("Steel", "Tower", Uuid::new_v4());
            let selections: Vec<WorkerSelection> = roles
                .iter()
                .map(|role| WorkerSelection::new(UserProfile::new(Uuid::new_v4(), "w@example.com", "W", *role)))
                .collect();

            let result = plan_worker_assignment(&officer, &delivery, &TaskBrief::default(), &selections, Utc::now());
            if roles.iter().all(|r| r.is_worker()) {
                let plan = result.unwrap();
                prop_assert_eq!(plan.assignments.len(), roles.len());
                prop_assert_eq!(plan.notifications.len(), roles.len());
                for assignment in &plan.assignments {
                    prop_assert_eq!(assignment.delivery_id, Some(delivery.id));
                }
            } else {
                prop_assert!(matches!(result, Err(InsituError::Validation(_))));
            }
        }
    }
}
