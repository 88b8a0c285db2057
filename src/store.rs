//! Document store gateway.
//!
//! Models the hosted store's API surface that the handlers rely on:
//! collection-scoped add/get/query (field equality, array-contains-any,
//! timestamp lower bound, result limit) and batched atomic multi-document
//! writes with server-assigned creation timestamps. Documents are untyped
//! JSON objects; no uniqueness or referential-integrity checks beyond ids.
//!
//! Backing is an in-process `RwLock`ed map per collection; a batch commits
//! under a single write lock, so readers never observe a partial batch.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;

pub const CHALLENGES: &str = "challenges";
pub const CURRICULA: &str = "curricula";
pub const AI_USAGE: &str = "ai_usage";
pub const STUDENT_QUERIES: &str = "student_queries";

/// Field stamped on every stored document at write time.
pub const CREATED_AT: &str = "createdAt";

/// Fixed-width RFC 3339 rendering so stored timestamps compare correctly
/// as strings (used by `Filter::Gte` on `createdAt`).
pub fn rfc3339_micros(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A stored document: server-assigned id plus the JSON object payload.
#[derive(Clone, Debug)]
pub struct Doc {
    pub id: String,
    pub data: Value,
}

/// Query filters supported by the gateway. All filters on a query are ANDed.
#[derive(Clone, Debug)]
pub enum Filter {
    /// Field equals the given value.
    Eq(&'static str, Value),
    /// Array field shares at least one element with the given set.
    ArrayContainsAny(&'static str, Vec<Value>),
    /// Field is >= the given value (string or numeric comparison).
    Gte(&'static str, Value),
}

impl Filter {
    fn matches(&self, data: &Value) -> bool {
        match self {
            Filter::Eq(field, want) => data.get(*field).is_some_and(|v| v == want),
            Filter::ArrayContainsAny(field, any) => data
                .get(*field)
                .and_then(Value::as_array)
                .is_some_and(|arr| arr.iter().any(|v| any.contains(v))),
            Filter::Gte(field, bound) => data.get(*field).is_some_and(|v| gte(v, bound)),
        }
    }
}

fn gte(v: &Value, bound: &Value) -> bool {
    match (v, bound) {
        (Value::String(a), Value::String(b)) => a.as_str() >= b.as_str(),
        (Value::Number(a), Value::Number(b)) => {
            match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a >= b,
                _ => false,
            }
        }
        _ => false,
    }
}

/// A pending set of inserts committed atomically via `DocStore::commit`.
#[derive(Default)]
pub struct WriteBatch {
    writes: Vec<(&'static str, Value)>,
}

impl WriteBatch {
    pub fn set(&mut self, collection: &'static str, data: Value) {
        self.writes.push((collection, data));
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

#[derive(Default)]
pub struct DocStore {
    collections: RwLock<HashMap<String, Vec<Doc>>>,
}

impl DocStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one document. Assigns a fresh id and stamps `createdAt`.
    pub async fn add(&self, collection: &str, data: Value) -> Result<String, AppError> {
        let doc = stamped(data)?;
        let id = doc.id.clone();
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().push(doc);
        Ok(id)
    }

    /// Fetch one document by id.
    pub async fn get(&self, collection: &str, id: &str) -> Option<Doc> {
        let collections = self.collections.read().await;
        collections
            .get(collection)?
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    /// Filtered scan in insertion order, capped at `limit` when given.
    pub async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        limit: Option<usize>,
    ) -> Vec<Doc> {
        let collections = self.collections.read().await;
        let docs = match collections.get(collection) {
            Some(docs) => docs,
            None => return Vec::new(),
        };
        docs.iter()
            .filter(|d| filters.iter().all(|f| f.matches(&d.data)))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Commit every write in the batch under one write lock. Readers see
    /// either none or all of the batch.
    pub async fn commit(&self, batch: WriteBatch) -> Result<Vec<String>, AppError> {
        let mut stamped_docs = Vec::with_capacity(batch.writes.len());
        for (collection, data) in batch.writes {
            stamped_docs.push((collection, stamped(data)?));
        }
        let mut ids = Vec::with_capacity(stamped_docs.len());
        let mut collections = self.collections.write().await;
        for (collection, doc) in stamped_docs {
            ids.push(doc.id.clone());
            collections.entry(collection.to_string()).or_default().push(doc);
        }
        Ok(ids)
    }

    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, Vec::len)
    }
}

/// Wrap payload into a `Doc` with a fresh id and a server `createdAt` stamp.
fn stamped(mut data: Value) -> Result<Doc, AppError> {
    let obj = data
        .as_object_mut()
        .ok_or_else(|| AppError::Store("document payload must be a JSON object".into()))?;
    obj.insert(CREATED_AT.to_string(), Value::String(rfc3339_micros(Utc::now())));
    Ok(Doc { id: Uuid::new_v4().to_string(), data })
}
