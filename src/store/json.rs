//! Record store persisted as a single JSON document
//!
//! Every write rewrites the document atomically. Reads load the latest
//! document so separate processes observe each other's writes; concurrent
//! writers are not reconciled (last write wins). File IO runs on tokio's
//! blocking pool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{InsituError, Result};
use crate::fs;

use super::query::{Filter, Query};
use super::record::EntityKind;
use super::tables::Tables;
use super::RecordStore;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

fn load(path: &Path) -> Result<Tables> {
    if !path.exists() {
        return Ok(Tables::new());
    }
    fs::read_json(path).map_err(|e| match e {
        InsituError::Io(io) => InsituError::Upstream(format!("reading {}: {}", path.display(), io)),
        other => other,
    })
}

fn save(path: &Path, tables: &Tables) -> Result<()> {
    fs::write_json(path, tables).map_err(|e| match e {
        InsituError::Io(io) => InsituError::Upstream(format!("writing {}: {}", path.display(), io)),
        other => other,
    })
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run document IO on the blocking pool while holding the store lock
    async fn with_document<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
    {
        let _lock = self.guard.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || op(&path))
            .await
            .map_err(|e| InsituError::Upstream(format!("record store task failed: {}", e)))?
    }

    async fn mutate<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Tables) -> Result<T> + Send + 'static,
    {
        self.with_document(move |path| {
            let mut tables = load(path)?;
            let out = op(&mut tables)?;
            save(path, &tables)?;
            Ok(out)
        })
        .await
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn insert(&self, kind: EntityKind, rows: Vec<Value>) -> Result<Vec<Value>> {
        self.mutate(move |t| t.insert(kind, rows)).await
    }

    async fn update(&self, kind: EntityKind, id: Uuid, patch: Value) -> Result<Value> {
        self.mutate(move |t| t.update(kind, id, &patch)).await
    }

    async fn update_where(&self, kind: EntityKind, filters: Vec<Filter>, patch: Value) -> Result<usize> {
        self.mutate(move |t| t.update_where(kind, &filters, &patch)).await
    }

    async fn upsert(&self, kind: EntityKind, row: Value) -> Result<Value> {
        self.mutate(move |t| t.upsert(kind, row)).await
    }

    async fn query(&self, kind: EntityKind, query: &Query) -> Result<Vec<Value>> {
        let query = query.clone();
        self.with_document(move |path| Ok(load(path)?.query(kind, &query))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{Notification, NewNotification};
    use crate::store::{fetch_records, insert_record};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp.path().join("records.json"));
        let rows = store.query(EntityKind::Delivery, &Query::new()).await.unwrap();
        assert!(rows.is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_writes_are_visible_to_a_second_handle() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("records.json");
        let user = Uuid::new_v4();

        let first = JsonFileStore::open(&path);
        let row = NewNotification::new(user, "system", "Hello", "World").into_notification(chrono::Utc::now());
        insert_record(&first, &row).await.unwrap();
        assert!(path.exists());

        let second = JsonFileStore::open(&path);
        let rows: Vec<Notification> = fetch_records(&second, &Query::new()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, user);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_file_untouched() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp.path().join("records.json"));
        let err = store
            .update(EntityKind::Delivery, Uuid::new_v4(), serde_json::json!({"status": "assigned"}))
            .await
            .unwrap_err();
        assert!(matches!(err, InsituError::NotFound(_)));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::open(&path);
        let err = store.query(EntityKind::Delivery, &Query::new()).await.unwrap_err();
        assert!(matches!(err, InsituError::InvalidJson(_)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_concurrent_writers_on_one_handle_all_land() {
        let temp = TempDir::new().unwrap();
        let store = std::sync::Arc::new(JsonFileStore::open(temp.path().join("records.json")));
        let user = Uuid::new_v4();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let row = NewNotification::new(user, "system", format!("n{}", i), "hi")
                    .into_notification(chrono::Utc::now());
                insert_record(store.as_ref(), &row).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let rows: Vec<Notification> = fetch_records(store.as_ref(), &Query::new()).await.unwrap();
        assert_eq!(rows.len(), 8);
    }
}
