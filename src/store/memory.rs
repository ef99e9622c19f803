//! Process-local record store

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::Result;

use super::query::{Filter, Query};
use super::record::EntityKind;
use super::tables::Tables;
use super::RecordStore;

/// Record store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            tables: RwLock::new(Tables::new()),
        }
    }

    /// Seed from an existing snapshot
    pub fn from_tables(tables: Tables) -> Self {
        MemoryStore {
            tables: RwLock::new(tables),
        }
    }

    pub async fn snapshot(&self) -> Tables {
        self.tables.read().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, kind: EntityKind, rows: Vec<Value>) -> Result<Vec<Value>> {
        self.tables.write().await.insert(kind, rows)
    }

    async fn update(&self, kind: EntityKind, id: Uuid, patch: Value) -> Result<Value> {
        self.tables.write().await.update(kind, id, &patch)
    }

    async fn update_where(&self, kind: EntityKind, filters: Vec<Filter>, patch: Value) -> Result<usize> {
        self.tables.write().await.update_where(kind, &filters, &patch)
    }

    async fn upsert(&self, kind: EntityKind, row: Value) -> Result<Value> {
        self.tables.write().await.upsert(kind, row)
    }

    async fn query(&self, kind: EntityKind, query: &Query) -> Result<Vec<Value>> {
        Ok(self.tables.read().await.query(kind, query))
    }
}
