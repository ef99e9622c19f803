//! Workflow and authorization engine
//!
//! Everything here is pure: functions take the authoritative records and
//! return new records plus notification drafts. Writing them is the
//! service layer's job.

mod actions;
mod authorization;
mod batch;
mod states;
mod stats;
mod tabs;
mod transitions;
mod validation;
mod visibility;

// Property-based tests (compiled only in test builds)
#[cfg(test)]
mod property_tests;

pub use actions::{
    AssignmentAction, DeliveryAction, RequestAction, ASSIGNMENT_ACTIONS, DELIVERY_ACTIONS,
    REQUEST_ACTIONS,
};
pub use authorization::{
    authorize_assignment_action, authorize_create_delivery, authorize_create_request,
    authorize_create_work_site, authorize_delivery_action, authorize_list_transporters,
    authorize_list_workers, authorize_notification_update, authorize_request_action,
    authorize_work_site_use, authorize_worker_batch, Actor,
};
pub use batch::{plan_worker_assignment, TaskBrief, WorkerBatchPlan, WorkerSelection};
pub use states::{
    get_allowed_next_states, get_next_state, get_state_index, is_terminal_state, Lifecycle,
    ASSIGNMENT_STATES, DELIVERY_STATES, REQUEST_STATES,
};
pub use stats::DashboardStats;
pub use tabs::{default_tab, tabs_for, Tab};
pub use transitions::{
    apply_assignment_action, apply_delivery_action, apply_request_action,
    assignment_timestamps_consistent, delivery_timestamps_consistent, permitted_assignment_actions,
    permitted_delivery_actions, permitted_request_actions, PermittedActions, Transition,
    TransitionContext,
};
pub use validation::{
    require_text, validate_email, validate_image, validate_new_delivery, validate_new_request,
    validate_new_work_site,
};
pub use visibility::{
    assignment_scope, can_view_assignment, can_view_delivery, can_view_notification,
    can_view_request, can_view_work_site, delivery_scope, notification_scope, request_scope,
    work_site_scope,
};
