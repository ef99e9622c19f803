//! Record-store collaborator
//!
//! The store speaks JSON rows keyed by entity kind. Typed helpers convert
//! through serde so the rest of the crate works with schema types.

mod json;
mod memory;
mod query;
mod record;
mod tables;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{InsituError, Result};

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use query::{compare_values, Direction, Filter, Query};
pub use record::{from_row, to_row, EntityKind, Record};
pub use tables::Tables;

/// Durable record storage
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert rows; all or nothing
    async fn insert(&self, kind: EntityKind, rows: Vec<Value>) -> Result<Vec<Value>>;

    /// Merge a partial row into the row with the given id
    async fn update(&self, kind: EntityKind, id: Uuid, patch: Value) -> Result<Value>;

    /// Merge a partial row into every row matching the filters
    async fn update_where(&self, kind: EntityKind, filters: Vec<Filter>, patch: Value) -> Result<usize>;

    /// Insert or replace by id
    async fn upsert(&self, kind: EntityKind, row: Value) -> Result<Value>;

    async fn query(&self, kind: EntityKind, query: &Query) -> Result<Vec<Value>>;
}

pub async fn insert_record<R: Record>(store: &dyn RecordStore, record: &R) -> Result<R> {
    let mut rows = store.insert(R::KIND, vec![to_row(record)?]).await?;
    let row = rows
        .pop()
        .ok_or_else(|| InsituError::Upstream(format!("{} insert returned no row", R::KIND)))?;
    from_row(row)
}

pub async fn insert_records<R: Record>(store: &dyn RecordStore, records: &[R]) -> Result<Vec<R>> {
    let rows = records.iter().map(to_row).collect::<Result<Vec<_>>>()?;
    store
        .insert(R::KIND, rows)
        .await?
        .into_iter()
        .map(from_row)
        .collect()
}

/// Write the full record over the stored row
pub async fn update_record<R: Record>(store: &dyn RecordStore, record: &R) -> Result<R> {
    let row = store.update(R::KIND, record.id(), to_row(record)?).await?;
    from_row(row)
}

pub async fn upsert_record<R: Record>(store: &dyn RecordStore, record: &R) -> Result<R> {
    let row = store.upsert(R::KIND, to_row(record)?).await?;
    from_row(row)
}

pub async fn fetch_records<R: Record>(store: &dyn RecordStore, query: &Query) -> Result<Vec<R>> {
    store.query(R::KIND, query).await?.into_iter().map(from_row).collect()
}

pub async fn fetch_by_id<R: Record>(store: &dyn RecordStore, id: Uuid) -> Result<Option<R>> {
    let query = Query::new().filter(Filter::eq("id", id.to_string())).limit(1);
    let mut rows = store.query(R::KIND, &query).await?;
    rows.pop().map(from_row).transpose()
}

/// Fetch by id, mapping absence to `NotFound`
pub async fn require_by_id<R: Record>(store: &dyn RecordStore, id: Uuid) -> Result<R> {
    fetch_by_id(store, id)
        .await?
        .ok_or_else(|| InsituError::NotFound(format!("{} {}", R::KIND, id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{Delivery, DeliveryStatus};

    #[tokio::test]
    async fn test_typed_helpers_round_trip() {
        let store = MemoryStore::new();
        let delivery = Delivery::new("Tiles", "Depot 2", Uuid::new_v4());

        insert_record(&store, &delivery).await.unwrap();
        let fetched: Delivery = require_by_id(&store, delivery.id).await.unwrap();
        assert_eq!(fetched, delivery);

        let moved = fetched.with_status(DeliveryStatus::Assigned, chrono::Utc::now());
        let written = update_record(&store, &moved).await.unwrap();
        assert_eq!(written.status, DeliveryStatus::Assigned);
    }

    #[tokio::test]
    async fn test_require_by_id_missing() {
        let store = MemoryStore::new();
        let err = require_by_id::<Delivery>(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, InsituError::NotFound(_)));
        assert!(fetch_by_id::<Delivery>(&store, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_records_batch() {
        let store = MemoryStore::new();
        let creator = Uuid::new_v4();
        let batch = vec![Delivery::new("A", "X", creator), Delivery::new("B", "Y", creator)];
        let written = insert_records(&store, &batch).await.unwrap();
        assert_eq!(written.len(), 2);

        let all: Vec<Delivery> = fetch_records(&store, &Query::new()).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
