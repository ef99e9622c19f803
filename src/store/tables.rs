//! Table operations shared by the in-memory and file-backed stores

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{InsituError, Result};

use super::query::{Filter, Query};
use super::record::EntityKind;

/// Every table's rows, keyed by entity kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub schema_version: u32,

    #[serde(default)]
    pub tables: BTreeMap<EntityKind, Vec<Value>>,
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn merge(row: &mut Value, patch: &Value) -> Result<()> {
    let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) else {
        return Err(InsituError::Validation("update patch must be a JSON object".to_string()));
    };
    for (key, value) in fields {
        if key == "id" {
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
    Ok(())
}

impl Tables {
    pub fn new() -> Self {
        Tables {
            schema_version: 1,
            tables: BTreeMap::new(),
        }
    }

    fn rows(&self, kind: EntityKind) -> &[Value] {
        self.tables.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Insert rows atomically: either every row lands or none does
    pub fn insert(&mut self, kind: EntityKind, rows: Vec<Value>) -> Result<Vec<Value>> {
        let existing = self.rows(kind);
        let mut seen: Vec<&str> = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = row_id(row).ok_or_else(|| {
                InsituError::Validation(format!("{} row is missing a string id", kind))
            })?;
            if seen.contains(&id) || existing.iter().any(|r| row_id(r) == Some(id)) {
                return Err(InsituError::Upstream(format!("duplicate key {} in {}", id, kind)));
            }
            seen.push(id);
        }
        self.tables.entry(kind).or_default().extend(rows.iter().cloned());
        Ok(rows)
    }

    /// Merge a patch into the row with the given id
    pub fn update(&mut self, kind: EntityKind, id: Uuid, patch: &Value) -> Result<Value> {
        let id = id.to_string();
        let row = self
            .tables
            .get_mut(&kind)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id.as_str())))
            .ok_or_else(|| InsituError::NotFound(format!("{} {}", kind, id)))?;
        merge(row, patch)?;
        Ok(row.clone())
    }

    /// Merge a patch into every row matching all filters; returns the count
    pub fn update_where(&mut self, kind: EntityKind, filters: &[Filter], patch: &Value) -> Result<usize> {
        let Some(rows) = self.tables.get_mut(&kind) else {
            return Ok(0);
        };
        let mut updated = 0;
        for row in rows.iter_mut().filter(|r| filters.iter().all(|f| f.matches(r))) {
            merge(row, patch)?;
            updated += 1;
        }
        Ok(updated)
    }

    /// Insert or replace by id
    pub fn upsert(&mut self, kind: EntityKind, row: Value) -> Result<Value> {
        let id = row_id(&row)
            .ok_or_else(|| InsituError::Validation(format!("{} row is missing a string id", kind)))?
            .to_string();
        let rows = self.tables.entry(kind).or_default();
        match rows.iter_mut().find(|r| row_id(r) == Some(id.as_str())) {
            Some(existing) => *existing = row.clone(),
            None => rows.push(row.clone()),
        }
        Ok(row)
    }

    pub fn query(&self, kind: EntityKind, query: &Query) -> Vec<Value> {
        query.apply(self.rows(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: Uuid) -> Value {
        json!({"id": id.to_string(), "read": false, "user_id": "u1"})
    }

    #[test]
    fn test_insert_rejects_duplicates_without_partial_write() {
        let mut tables = Tables::new();
        let a = Uuid::new_v4();
        tables.insert(EntityKind::Notification, vec![row(a)]).unwrap();

        let b = Uuid::new_v4();
        let err = tables.insert(EntityKind::Notification, vec![row(b), row(a)]).unwrap_err();
        assert!(matches!(err, InsituError::Upstream(_)));
        assert_eq!(tables.query(EntityKind::Notification, &Query::new()).len(), 1);
    }

    #[test]
    fn test_update_merges_and_keeps_id() {
        let mut tables = Tables::new();
        let id = Uuid::new_v4();
        tables.insert(EntityKind::Notification, vec![row(id)]).unwrap();

        let updated = tables
            .update(EntityKind::Notification, id, &json!({"read": true, "id": "hijack"}))
            .unwrap();
        assert_eq!(updated["read"], true);
        assert_eq!(updated["id"], id.to_string());
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let mut tables = Tables::new();
        let err = tables
            .update(EntityKind::Delivery, Uuid::new_v4(), &json!({"status": "assigned"}))
            .unwrap_err();
        assert!(matches!(err, InsituError::NotFound(_)));
    }

    #[test]
    fn test_update_where_counts_matches() {
        let mut tables = Tables::new();
        tables
            .insert(EntityKind::Notification, vec![row(Uuid::new_v4()), row(Uuid::new_v4())])
            .unwrap();
        let filters = vec![Filter::eq("user_id", "u1"), Filter::eq("read", false)];
        assert_eq!(tables.update_where(EntityKind::Notification, &filters, &json!({"read": true})).unwrap(), 2);
        assert_eq!(tables.update_where(EntityKind::Notification, &filters, &json!({"read": true})).unwrap(), 0);
    }

    #[test]
    fn test_upsert_replaces() {
        let mut tables = Tables::new();
        let id = Uuid::new_v4();
        tables.upsert(EntityKind::Profile, json!({"id": id.to_string(), "full_name": "A"})).unwrap();
        tables.upsert(EntityKind::Profile, json!({"id": id.to_string(), "full_name": "B"})).unwrap();
        let rows = tables.query(EntityKind::Profile, &Query::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["full_name"], "B");
    }
}
