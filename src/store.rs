// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Document Store
 * Owner-scoped document storage with merge-patch update semantics
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::types::Scan;

/// Document store for scan records, keyed by `(ownerId, scanId)`.
///
/// Updates always use merge-patch semantics, never a blind overwrite, so
/// concurrent readers of unrelated fields never observe a torn write.
/// Schema migrations and indexing are the backing store's concern.
#[async_trait::async_trait]
pub trait ScanStore: Send + Sync {
    /// Persist a new scan and return its assigned id.
    async fn create(&self, owner_id: &str, scan: &Scan) -> Result<String, StoreError>;

    async fn get(&self, owner_id: &str, id: &str) -> Result<Scan, StoreError>;

    /// Merge the partial record into the stored document. Object fields
    /// merge recursively; arrays and scalars replace; an explicit null
    /// removes the field.
    async fn patch(&self, owner_id: &str, id: &str, partial: Value) -> Result<(), StoreError>;

    /// All scans for an owner, newest first.
    async fn list(&self, owner_id: &str, limit: Option<usize>) -> Result<Vec<Scan>, StoreError>;
}

/// Recursive merge-patch (RFC 7396 shape).
pub fn merge_patch(target: &mut Value, patch: &Value) {
    match patch {
        Value::Object(patch_map) => {
            if !target.is_object() {
                *target = Value::Object(serde_json::Map::new());
            }
            let target_map = target.as_object_mut().expect("target coerced to object");
            for (key, value) in patch_map {
                if value.is_null() {
                    target_map.remove(key);
                } else {
                    merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), value);
                }
            }
        }
        other => {
            *target = other.clone();
        }
    }
}

/// In-memory reference implementation, used by tests and the CLI.
#[derive(Default)]
pub struct MemoryScanStore {
    records: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryScanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ScanStore for MemoryScanStore {
    async fn create(&self, owner_id: &str, scan: &Scan) -> Result<String, StoreError> {
        let id = format!("scan-{}", Uuid::new_v4());

        let mut document =
            serde_json::to_value(scan).map_err(|e| StoreError::Backend(e.to_string()))?;
        document["id"] = Value::String(id.clone());
        document["ownerId"] = Value::String(owner_id.to_string());

        let mut records = self.records.write().await;
        records
            .entry(owner_id.to_string())
            .or_default()
            .insert(id.clone(), document);

        Ok(id)
    }

    async fn get(&self, owner_id: &str, id: &str) -> Result<Scan, StoreError> {
        let records = self.records.read().await;
        let document = records
            .get(owner_id)
            .and_then(|owned| owned.get(id))
            .ok_or_else(|| StoreError::NotFound {
                owner_id: owner_id.to_string(),
                id: id.to_string(),
            })?;

        serde_json::from_value(document.clone()).map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn patch(&self, owner_id: &str, id: &str, partial: Value) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let document = records
            .get_mut(owner_id)
            .and_then(|owned| owned.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                owner_id: owner_id.to_string(),
                id: id.to_string(),
            })?;

        merge_patch(document, &partial);
        Ok(())
    }

    async fn list(&self, owner_id: &str, limit: Option<usize>) -> Result<Vec<Scan>, StoreError> {
        let records = self.records.read().await;
        let mut scans: Vec<Scan> = records
            .get(owner_id)
            .map(|owned| {
                owned
                    .values()
                    .filter_map(|doc| serde_json::from_value(doc.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        // RFC3339 timestamps sort lexicographically
        scans.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = limit {
            scans.truncate(limit);
        }
        Ok(scans)
    }
}
