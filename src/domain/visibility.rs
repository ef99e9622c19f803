//! Per-role visibility scopes
//!
//! Each scope is a store query for the rows a role may fetch. `None` means the
//! role sees no rows of that kind. The `can_view_*` predicates express the
//! same rules over typed records so fetched rows can be re-checked.

use uuid::Uuid;

use crate::schemas::{Delivery, Notification, Role, WarehouseRequest, WorkAssignment, WorkSite};
use crate::store::{Filter, Query};

use super::authorization::Actor;

fn owned_by(field: &str, id: Uuid) -> Filter {
    Filter::eq(field, id.to_string())
}

pub fn delivery_scope(actor: &Actor) -> Option<Query> {
    let query = Query::new().newest_first();
    match actor.role {
        Role::WarehouseOfficer => Some(query),
        Role::Transporter => Some(query.filter(Filter::any(vec![
            owned_by("assigned_to", actor.id),
            owned_by("created_by", actor.id),
        ]))),
        Role::SiteManager => Some(query.filter(owned_by("created_by", actor.id))),
        Role::MachineryOperator | Role::LogisticsLaborer => None,
    }
}

pub fn request_scope(actor: &Actor) -> Option<Query> {
    let query = Query::new().newest_first();
    match actor.role {
        Role::WarehouseOfficer => Some(query),
        Role::SiteManager => Some(query.filter(owned_by("requested_by", actor.id))),
        _ => None,
    }
}

pub fn assignment_scope(actor: &Actor) -> Option<Query> {
    let query = Query::new().newest_first();
    match actor.role {
        Role::WarehouseOfficer => Some(query),
        Role::SiteManager => Some(query.filter(owned_by("created_by", actor.id))),
        Role::MachineryOperator | Role::LogisticsLaborer => {
            Some(query.filter(owned_by("assigned_to", actor.id)))
        }
        Role::Transporter => None,
    }
}

/// Work sites are visible to their owning site manager only
pub fn work_site_scope(actor: &Actor) -> Option<Query> {
    match actor.role {
        Role::SiteManager => Some(Query::new().newest_first().filter(owned_by("site_manager_id", actor.id))),
        _ => None,
    }
}

/// Every role sees its own notifications
pub fn notification_scope(actor: &Actor) -> Query {
    Query::new().newest_first().filter(owned_by("user_id", actor.id))
}

pub fn can_view_delivery(actor: &Actor, delivery: &Delivery) -> bool {
    match actor.role {
        Role::WarehouseOfficer => true,
        Role::Transporter => delivery.is_assigned_to(actor.id) || delivery.created_by == actor.id,
        Role::SiteManager => delivery.created_by == actor.id,
        Role::MachineryOperator | Role::LogisticsLaborer => false,
    }
}

pub fn can_view_request(actor: &Actor, request: &WarehouseRequest) -> bool {
    match actor.role {
        Role::WarehouseOfficer => true,
        Role::SiteManager => request.requested_by == actor.id,
        _ => false,
    }
}

pub fn can_view_assignment(actor: &Actor, assignment: &WorkAssignment) -> bool {
    match actor.role {
        Role::WarehouseOfficer => true,
        Role::SiteManager => assignment.created_by == actor.id,
        Role::MachineryOperator | Role::LogisticsLaborer => assignment.assigned_to == actor.id,
        Role::Transporter => false,
    }
}

pub fn can_view_work_site(actor: &Actor, site: &WorkSite) -> bool {
    actor.role == Role::SiteManager && site.site_manager_id == actor.id
}

pub fn can_view_notification(actor: &Actor, notification: &Notification) -> bool {
    notification.user_id == actor.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{kinds, AssignmentType, NewNotification};
    use crate::store::to_row;
    use chrono::Utc;

    fn actor(role: Role) -> Actor {
        Actor::new(Uuid::new_v4(), role)
    }

    #[test]
    fn test_transporter_sees_assigned_or_created() {
        let me = actor(Role::Transporter);
        let mut assigned = Delivery::new("A", "X", Uuid::new_v4());
        assigned.assigned_to = Some(me.id);
        let created = Delivery::new("B", "Y", me.id);
        let other = Delivery::new("C", "Z", Uuid::new_v4());

        let scope = delivery_scope(&me).unwrap();
        for (delivery, expected) in [(&assigned, true), (&created, true), (&other, false)] {
            assert_eq!(can_view_delivery(&me, delivery), expected);
            assert_eq!(scope.matches(&to_row(delivery).unwrap()), expected);
        }
    }

    #[test]
    fn test_officer_sees_everything_supervisory() {
        let officer = actor(Role::WarehouseOfficer);
        let delivery = Delivery::new("A", "X", Uuid::new_v4());
        let request = WarehouseRequest::new("Rebar", 4, Uuid::new_v4());
        assert!(can_view_delivery(&officer, &delivery));
        assert!(can_view_request(&officer, &request));
        assert!(delivery_scope(&officer).unwrap().filters.is_empty());
        assert!(work_site_scope(&officer).is_none());
    }

    #[test]
    fn test_site_manager_scopes_follow_ownership() {
        let manager = actor(Role::SiteManager);
        let mine = WarehouseRequest::new("Sand", 2, manager.id);
        let theirs = WarehouseRequest::new("Sand", 2, Uuid::new_v4());
        let scope = request_scope(&manager).unwrap();
        assert!(scope.matches(&to_row(&mine).unwrap()));
        assert!(!scope.matches(&to_row(&theirs).unwrap()));
        assert!(can_view_request(&manager, &mine));
        assert!(!can_view_request(&manager, &theirs));

        let site = WorkSite::new("North tower", "1 Main St", manager.id);
        assert!(can_view_work_site(&manager, &site));
        assert!(work_site_scope(&manager).unwrap().matches(&to_row(&site).unwrap()));
    }

    #[test]
    fn test_workers_see_only_their_assignments() {
        let operator = actor(Role::MachineryOperator);
        let mine = WorkAssignment::new("Crane", operator.id, AssignmentType::Machinery, Uuid::new_v4());
        let theirs = WorkAssignment::new("Crane", Uuid::new_v4(), AssignmentType::Machinery, Uuid::new_v4());
        let scope = assignment_scope(&operator).unwrap();
        assert!(scope.matches(&to_row(&mine).unwrap()));
        assert!(!scope.matches(&to_row(&theirs).unwrap()));
        assert!(delivery_scope(&operator).is_none());
        assert!(assignment_scope(&actor(Role::Transporter)).is_none());
    }

    #[test]
    fn test_notifications_scoped_to_recipient_for_every_role() {
        for role in crate::schemas::ALL_ROLES.iter().copied() {
            let me = actor(role);
            let mine = NewNotification::new(me.id, kinds::SYSTEM, "Hi", "Hello").into_notification(Utc::now());
            let theirs =
                NewNotification::new(Uuid::new_v4(), kinds::SYSTEM, "Hi", "Hello").into_notification(Utc::now());
            let scope = notification_scope(&me);
            assert!(scope.matches(&to_row(&mine).unwrap()));
            assert!(!scope.matches(&to_row(&theirs).unwrap()));
            assert!(can_view_notification(&me, &mine));
            assert!(!can_view_notification(&me, &theirs));
        }
    }
}
