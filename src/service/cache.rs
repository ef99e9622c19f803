//! Caller-owned dashboard cache
//!
//! Holds the last snapshot for display only. Mutations always go through the
//! coordinator, which re-reads authoritative records; callers invalidate
//! after every successful mutation.

use crate::domain::Actor;
use crate::errors::Result;

use super::coordinator::{Coordinator, DashboardSnapshot};

#[derive(Debug, Default)]
pub struct DashboardCache {
    snapshot: Option<DashboardSnapshot>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_stale(&self) -> bool {
        self.snapshot.is_none()
    }

    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Refetch unconditionally
    pub async fn refresh(&mut self, coordinator: &Coordinator, actor: &Actor) -> Result<&DashboardSnapshot> {
        let snapshot = coordinator.load_dashboard(actor).await?;
        Ok(self.snapshot.insert(snapshot))
    }

    /// Return the cached snapshot for this actor, loading it if missing
    pub async fn get_or_load(&mut self, coordinator: &Coordinator, actor: &Actor) -> Result<&DashboardSnapshot> {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) if snapshot.profile.id == actor.id => snapshot,
            _ => coordinator.load_dashboard(actor).await?,
        };
        Ok(self.snapshot.insert(snapshot))
    }
}
