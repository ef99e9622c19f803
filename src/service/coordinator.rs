//! One async operation per user action
//!
//! Every operation re-reads the caller's profile, so the role it authorizes
//! with is the stored one, not whatever the caller claims. Mutations then
//! re-read the authoritative record, run the pure domain function, write the
//! result and fan out notifications. Notification writes are best-effort:
//! failures are logged and never returned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    self, apply_assignment_action, apply_delivery_action, apply_request_action, Actor,
    AssignmentAction, DashboardStats, DeliveryAction, PermittedActions, RequestAction, Tab,
    TaskBrief, Transition, TransitionContext, WorkerSelection,
};
use crate::errors::{InsituError, Result};
use crate::schemas::{
    Config, Delivery, NewNotification, Notification, Role, UserProfile, WarehouseRequest,
    WorkAssignment, WorkSite, WORKER_ROLES,
};
use crate::storage::ObjectStorage;
use crate::store::{
    fetch_by_id, fetch_records, insert_record, insert_records, require_by_id, update_record,
    Direction, EntityKind, Filter, Query, RecordStore,
};

/// Fields of a new delivery
#[derive(Debug, Clone, Default)]
pub struct NewDelivery {
    pub title: String,
    pub description: Option<String>,
    pub delivery_address: String,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub work_site_id: Option<Uuid>,
}

/// A reference image attached to a new request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Fields of a new warehouse request
#[derive(Debug, Clone, Default)]
pub struct NewRequest {
    pub title: String,
    pub description: Option<String>,
    /// Checked for positivity before narrowing
    pub quantity: i64,
    pub unit: Option<String>,
    pub work_site_id: Option<Uuid>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, Default)]
pub struct NewWorkSite {
    pub name: String,
    pub address: String,
    pub description: Option<String>,
}

/// One worker chosen for a batch, by id
#[derive(Debug, Clone)]
pub struct WorkerPick {
    pub worker_id: Uuid,
    pub special_instructions: Option<String>,
    pub safety_requirements: Option<String>,
}

impl WorkerPick {
    pub fn new(worker_id: Uuid) -> Self {
        WorkerPick {
            worker_id,
            special_instructions: None,
            safety_requirements: None,
        }
    }
}

/// Everything the dashboard shows for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub profile: UserProfile,
    pub tabs: Vec<Tab>,
    pub default_tab: Tab,
    pub deliveries: Vec<Delivery>,
    pub requests: Vec<WarehouseRequest>,
    pub assignments: Vec<WorkAssignment>,
    pub work_sites: Vec<WorkSite>,
    pub notifications: Vec<Notification>,
    pub stats: DashboardStats,
    /// What the user may do next with each loaded record
    pub actions: PermittedActions,
    pub loaded_at: DateTime<Utc>,
}

fn image_extension(content_type: &str) -> &'static str {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

pub struct Coordinator {
    store: Arc<dyn RecordStore>,
    objects: Arc<dyn ObjectStorage>,
    config: Config,
}

impl Coordinator {
    pub fn new(store: Arc<dyn RecordStore>, objects: Arc<dyn ObjectStorage>, config: Config) -> Self {
        Coordinator { store, objects, config }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The stored profile behind `claimed`.
    ///
    /// A caller without a profile row is Forbidden.
    async fn profile_of(&self, claimed: &Actor) -> Result<UserProfile> {
        fetch_by_id::<UserProfile>(self.store(), claimed.id)
            .await?
            .ok_or_else(|| InsituError::Forbidden(format!("user {} has no profile", claimed.id)))
    }

    async fn resolve(&self, claimed: &Actor) -> Result<Actor> {
        let profile = self.profile_of(claimed).await?;
        if profile.role != claimed.role {
            debug!(user_id = %claimed.id, claimed = %claimed.role, stored = %profile.role, "Using stored role");
        }
        Ok(Actor::from(&profile))
    }

    /// Write notification drafts one by one. Returns how many were written.
    async fn fan_out(&self, drafts: Vec<NewNotification>) -> usize {
        let now = Utc::now();
        let mut written = 0;
        for draft in drafts {
            let recipient = draft.user_id;
            let kind = draft.kind.clone();
            match insert_record(self.store(), &draft.into_notification(now)).await {
                Ok(_) => written += 1,
                Err(e) => warn!(
                    user_id = %recipient,
                    kind = %kind,
                    error = %e,
                    "Failed to create notification"
                ),
            }
        }
        written
    }

    async fn commit<R>(&self, transition: Transition<R>) -> Result<R>
    where
        R: crate::store::Record,
    {
        let written = update_record(self.store(), &transition.next).await?;
        self.fan_out(transition.notifications).await;
        Ok(written)
    }

    // ===== DELIVERIES =====

    pub async fn create_delivery(&self, actor: &Actor, input: NewDelivery) -> Result<Delivery> {
        let actor = &self.resolve(actor).await?;
        domain::authorize_create_delivery(actor)?;
        domain::validate_new_delivery(&input.title, &input.delivery_address)?;
        if let Some(site_id) = input.work_site_id {
            let site: WorkSite = require_by_id(self.store(), site_id).await?;
            domain::authorize_work_site_use(actor, &site)?;
        }

        let delivery = Delivery::new(input.title.trim(), input.delivery_address.trim(), actor.id)
            .with_description(input.description)
            .with_scheduled_date(input.scheduled_date)
            .with_work_site(input.work_site_id);
        let written = insert_record(self.store(), &delivery).await?;
        info!(delivery_id = %written.id, created_by = %actor.id, "Created delivery");
        Ok(written)
    }

    async fn advance_delivery(
        &self,
        actor: &Actor,
        delivery_id: Uuid,
        action: DeliveryAction,
        assignee: Option<UserProfile>,
    ) -> Result<Delivery> {
        let actor = &self.resolve(actor).await?;
        let delivery: Delivery = require_by_id(self.store(), delivery_id).await?;
        let ctx = TransitionContext::at(Utc::now()).with_assignee(assignee);
        let transition = apply_delivery_action(actor, &delivery, action, &ctx)?;
        let written = self.commit(transition).await?;
        info!(
            delivery_id = %written.id,
            action = %action,
            status = %written.status,
            "Delivery advanced"
        );
        Ok(written)
    }

    /// Assign a pending delivery to a transporter
    pub async fn assign_transporter(&self, actor: &Actor, delivery_id: Uuid, transporter_id: Uuid) -> Result<Delivery> {
        let transporter = fetch_by_id::<UserProfile>(self.store(), transporter_id).await?;
        self.advance_delivery(actor, delivery_id, DeliveryAction::Assign, transporter)
            .await
    }

    pub async fn start_transit(&self, actor: &Actor, delivery_id: Uuid) -> Result<Delivery> {
        self.advance_delivery(actor, delivery_id, DeliveryAction::StartTransit, None)
            .await
    }

    pub async fn mark_delivered(&self, actor: &Actor, delivery_id: Uuid) -> Result<Delivery> {
        self.advance_delivery(actor, delivery_id, DeliveryAction::MarkDelivered, None)
            .await
    }

    pub async fn complete_delivery(&self, actor: &Actor, delivery_id: Uuid) -> Result<Delivery> {
        self.advance_delivery(actor, delivery_id, DeliveryAction::Complete, None)
            .await
    }

    // ===== WAREHOUSE REQUESTS =====

    /// File a warehouse request, uploading the reference image first.
    ///
    /// Nothing is written when validation fails. A failed upload aborts the
    /// request.
    pub async fn create_request(&self, actor: &Actor, input: NewRequest) -> Result<WarehouseRequest> {
        let actor = &self.resolve(actor).await?;
        domain::authorize_create_request(actor)?;
        let quantity = domain::validate_new_request(&input.title, input.quantity)?;
        if let Some(image) = &input.image {
            domain::validate_image(image.bytes.len(), &image.content_type, &self.config.images)?;
        }
        if let Some(site_id) = input.work_site_id {
            let site: WorkSite = require_by_id(self.store(), site_id).await?;
            domain::authorize_work_site_use(actor, &site)?;
        }

        let mut request = WarehouseRequest::new(input.title.trim(), quantity, actor.id);
        request.description = input.description;
        request.unit = input.unit;
        request.work_site_id = input.work_site_id;

        if let Some(image) = input.image {
            let path = format!("{}/{}.{}", actor.id, request.id, image_extension(&image.content_type));
            let url = self.objects.upload(image.bytes, &path, &image.content_type).await?;
            request.image_url = Some(url);
        }

        let written = insert_record(self.store(), &request).await?;
        info!(request_id = %written.id, requested_by = %actor.id, quantity, "Created warehouse request");
        Ok(written)
    }

    async fn advance_request(&self, actor: &Actor, request_id: Uuid, action: RequestAction) -> Result<WarehouseRequest> {
        let actor = &self.resolve(actor).await?;
        let request: WarehouseRequest = require_by_id(self.store(), request_id).await?;
        let transition = apply_request_action(actor, &request, action, &TransitionContext::at(Utc::now()))?;
        let written = self.commit(transition).await?;
        info!(request_id = %written.id, action = %action, status = %written.status, "Request advanced");
        Ok(written)
    }

    pub async fn approve_request(&self, actor: &Actor, request_id: Uuid) -> Result<WarehouseRequest> {
        self.advance_request(actor, request_id, RequestAction::Approve).await
    }

    pub async fn reject_request(&self, actor: &Actor, request_id: Uuid) -> Result<WarehouseRequest> {
        self.advance_request(actor, request_id, RequestAction::Reject).await
    }

    pub async fn complete_request(&self, actor: &Actor, request_id: Uuid) -> Result<WarehouseRequest> {
        self.advance_request(actor, request_id, RequestAction::Complete).await
    }

    // ===== WORK SITES =====

    pub async fn create_work_site(&self, actor: &Actor, input: NewWorkSite) -> Result<WorkSite> {
        let actor = &self.resolve(actor).await?;
        domain::authorize_create_work_site(actor)?;
        domain::validate_new_work_site(&input.name, &input.address)?;

        let mut site = WorkSite::new(input.name.trim(), input.address.trim(), actor.id);
        site.description = input.description;
        let written = insert_record(self.store(), &site).await?;
        info!(work_site_id = %written.id, site_manager_id = %actor.id, "Created work site");
        Ok(written)
    }

    pub async fn list_work_sites(&self, actor: &Actor) -> Result<Vec<WorkSite>> {
        let actor = &self.resolve(actor).await?;
        let Some(query) = domain::work_site_scope(actor) else {
            return Ok(Vec::new());
        };
        let sites: Vec<WorkSite> = fetch_records(self.store(), &query).await?;
        Ok(sites.into_iter().filter(|s| domain::can_view_work_site(actor, s)).collect())
    }

    // ===== PEOPLE =====

    pub async fn list_transporters(&self, actor: &Actor) -> Result<Vec<UserProfile>> {
        let actor = &self.resolve(actor).await?;
        domain::authorize_list_transporters(actor)?;
        let query = Query::new()
            .filter(Filter::eq("role", Role::Transporter.as_str()))
            .order_by("full_name", Direction::Ascending);
        let transporters = fetch_records(self.store(), &query).await?;
        debug!(count = transporters.len(), "Listed transporters");
        Ok(transporters)
    }

    pub async fn list_workers(&self, actor: &Actor) -> Result<Vec<UserProfile>> {
        let actor = &self.resolve(actor).await?;
        domain::authorize_list_workers(actor)?;
        let query = Query::new()
            .filter(Filter::one_of("role", WORKER_ROLES.iter().map(|r| r.as_str())))
            .order_by("full_name", Direction::Ascending);
        let workers = fetch_records(self.store(), &query).await?;
        debug!(count = workers.len(), "Listed workers");
        Ok(workers)
    }

    // ===== WORK ASSIGNMENTS =====

    async fn advance_assignment(
        &self,
        actor: &Actor,
        assignment_id: Uuid,
        action: AssignmentAction,
    ) -> Result<WorkAssignment> {
        let actor = &self.resolve(actor).await?;
        let assignment: WorkAssignment = require_by_id(self.store(), assignment_id).await?;
        let transition = apply_assignment_action(actor, &assignment, action, &TransitionContext::at(Utc::now()))?;
        let written = self.commit(transition).await?;
        info!(assignment_id = %written.id, action = %action, status = %written.status, "Assignment advanced");
        Ok(written)
    }

    pub async fn start_assignment(&self, actor: &Actor, assignment_id: Uuid) -> Result<WorkAssignment> {
        self.advance_assignment(actor, assignment_id, AssignmentAction::Start).await
    }

    pub async fn complete_assignment(&self, actor: &Actor, assignment_id: Uuid) -> Result<WorkAssignment> {
        self.advance_assignment(actor, assignment_id, AssignmentAction::Complete)
            .await
    }

    pub async fn cancel_assignment(&self, actor: &Actor, assignment_id: Uuid) -> Result<WorkAssignment> {
        self.advance_assignment(actor, assignment_id, AssignmentAction::Cancel).await
    }

    /// Assign personnel to a delivery.
    ///
    /// Every worker is resolved and checked before the assignments are
    /// written in one insert. Notifications follow, best-effort.
    pub async fn assign_workers(
        &self,
        actor: &Actor,
        delivery_id: Uuid,
        brief: TaskBrief,
        picks: Vec<WorkerPick>,
    ) -> Result<Vec<WorkAssignment>> {
        let actor = &self.resolve(actor).await?;
        domain::authorize_worker_batch(actor)?;
        let delivery: Delivery = require_by_id(self.store(), delivery_id).await?;

        let mut selections = Vec::with_capacity(picks.len());
        for pick in picks {
            let worker: UserProfile = require_by_id(self.store(), pick.worker_id).await?;
            selections.push(WorkerSelection {
                worker,
                special_instructions: pick.special_instructions,
                safety_requirements: pick.safety_requirements,
            });
        }

        let plan = domain::plan_worker_assignment(actor, &delivery, &brief, &selections, Utc::now())?;
        if plan.is_empty() {
            return Ok(Vec::new());
        }

        let written = insert_records(self.store(), &plan.assignments).await?;
        info!(delivery_id = %delivery.id, count = written.len(), "Assigned workers");

        let expected = plan.notifications.len();
        let sent = self.fan_out(plan.notifications).await;
        if sent < expected {
            warn!(delivery_id = %delivery.id, sent, expected, "Some workers were not notified");
        }
        Ok(written)
    }

    // ===== NOTIFICATIONS =====

    pub async fn mark_notification_read(&self, actor: &Actor, notification_id: Uuid) -> Result<Notification> {
        let actor = &self.resolve(actor).await?;
        let notification: Notification = require_by_id(self.store(), notification_id).await?;
        domain::authorize_notification_update(actor, &notification)?;
        if notification.read {
            return Ok(notification);
        }
        let row = self
            .store
            .update(EntityKind::Notification, notification.id, json!({ "read": true }))
            .await?;
        crate::store::from_row(row)
    }

    /// Returns how many notifications were flipped
    pub async fn mark_all_notifications_read(&self, actor: &Actor) -> Result<usize> {
        let actor = &self.resolve(actor).await?;
        let filters = vec![Filter::eq("user_id", actor.id.to_string()), Filter::eq("read", false)];
        let count = self
            .store
            .update_where(EntityKind::Notification, filters, json!({ "read": true }))
            .await?;
        info!(user_id = %actor.id, count, "Marked notifications read");
        Ok(count)
    }

    // ===== DASHBOARD =====

    async fn scoped<R>(&self, query: Option<Query>, limit: Option<usize>) -> Result<Vec<R>>
    where
        R: crate::store::Record,
    {
        let Some(mut query) = query else {
            return Ok(Vec::new());
        };
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        fetch_records(self.store(), &query).await
    }

    /// Fetch every role-scoped set and derive stats and tabs
    pub async fn load_dashboard(&self, actor: &Actor) -> Result<DashboardSnapshot> {
        let profile = self.profile_of(actor).await?;
        let actor = Actor::from(&profile);
        let limits = &self.config.limits;

        let deliveries: Vec<Delivery> = self
            .scoped(domain::delivery_scope(&actor), Some(limits.deliveries))
            .await?;
        let requests: Vec<WarehouseRequest> = self
            .scoped(domain::request_scope(&actor), Some(limits.requests))
            .await?;
        let assignments: Vec<WorkAssignment> = self.scoped(domain::assignment_scope(&actor), None).await?;
        let work_sites: Vec<WorkSite> = self.scoped(domain::work_site_scope(&actor), None).await?;
        let notifications: Vec<Notification> = self
            .scoped(Some(domain::notification_scope(&actor)), Some(limits.notifications))
            .await?;

        let deliveries: Vec<Delivery> = deliveries
            .into_iter()
            .filter(|d| domain::can_view_delivery(&actor, d))
            .collect();
        let requests: Vec<WarehouseRequest> = requests
            .into_iter()
            .filter(|r| domain::can_view_request(&actor, r))
            .collect();
        let assignments: Vec<WorkAssignment> = assignments
            .into_iter()
            .filter(|a| domain::can_view_assignment(&actor, a))
            .collect();
        let work_sites: Vec<WorkSite> = work_sites
            .into_iter()
            .filter(|s| domain::can_view_work_site(&actor, s))
            .collect();
        let notifications: Vec<Notification> = notifications
            .into_iter()
            .filter(|n| domain::can_view_notification(&actor, n))
            .collect();

        let stats = DashboardStats::compute(&deliveries, &notifications, &assignments);
        let actions = PermittedActions::compute(&actor, &deliveries, &requests, &assignments);
        debug!(
            user_id = %actor.id,
            deliveries = deliveries.len(),
            requests = requests.len(),
            assignments = assignments.len(),
            notifications = notifications.len(),
            "Loaded dashboard"
        );

        Ok(DashboardSnapshot {
            tabs: domain::tabs_for(profile.role),
            default_tab: domain::default_tab(profile.role),
            profile,
            deliveries,
            requests,
            assignments,
            work_sites,
            notifications,
            stats,
            actions,
            loaded_at: Utc::now(),
        })
    }
}
