//! Persistence Gateway
//!
//! Read/write/batch-write primitives over a document store. The contract
//! is deliberately narrow: per-document writes are atomic, multi-document
//! batches are atomic where the store supports transactions and flagged
//! best-effort where it does not. The catalog engine layers its
//! invariants on top of exactly this.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Gateway error types
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transient store fault; reads may retry, writes never do
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Partial batch: {applied} applied, {failed} failed")]
    Partial { applied: usize, failed: usize },

    #[error("Serialization error: {0}")]
    Serde(String),
}

impl GatewayError {
    /// Faults worth retrying on the read path
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Unavailable(_))
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serde(err.to_string())
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// A stored document: record key plus JSON body. The body never carries
/// the key; it is spliced in and out at the model boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Serialize a model into a document, pulling its `id` field out of
    /// the body. A model without an id yields an empty key and the store
    /// assigns one on create.
    pub fn from_model<T: Serialize>(model: &T) -> GatewayResult<Document> {
        let mut data = serde_json::to_value(model)?;
        let map = data
            .as_object_mut()
            .ok_or_else(|| GatewayError::Serde("model is not a JSON object".to_string()))?;
        let id = match map.remove("id") {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        Ok(Document { id, data })
    }

    /// Deserialize into a model, injecting the record key as `id`
    pub fn into_model<T: DeserializeOwned>(self) -> GatewayResult<T> {
        let Document { id, mut data } = self;
        if let Some(map) = data.as_object_mut() {
            map.insert("id".to_string(), Value::String(id));
        }
        serde_json::from_value(data).map_err(Into::into)
    }
}

/// Conjunction of top-level field equality constraints
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((field.to_string(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// Evaluate against a document body; a missing field compares as null
    pub fn matches(&self, data: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| data.get(field).unwrap_or(&Value::Null) == expected)
    }
}

/// One document mutation inside a batch
#[derive(Debug, Clone)]
pub struct WriteOp {
    pub collection: &'static str,
    pub id: String,
    /// Partial body merged over the stored document; null clears a field
    pub patch: Value,
}

/// How the store applied a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// One transaction: all or nothing
    Atomic,
    /// Store without multi-document transactions: ops applied one by one
    BestEffort { applied: usize, failed: usize },
}

impl BatchOutcome {
    /// Whether every op in the batch took effect
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            BatchOutcome::Atomic | BatchOutcome::BestEffort { failed: 0, .. }
        )
    }
}

/// Document-store contract consumed by the catalog engine
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn get_all(&self, collection: &str, filter: &Filter) -> GatewayResult<Vec<Document>>;

    async fn get(&self, collection: &str, id: &str) -> GatewayResult<Option<Document>>;

    /// Insert a document, assigning a key when the document has none.
    /// Returns the key.
    async fn create(&self, collection: &str, doc: Document) -> GatewayResult<String>;

    /// Merge a partial body over an existing document; `NotFound` when the
    /// document is absent
    async fn update(&self, collection: &str, id: &str, patch: Value) -> GatewayResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> GatewayResult<()>;

    /// Submit a write set as a unit. Implementations with transactions
    /// return [`BatchOutcome::Atomic`]; others report how far they got and
    /// the caller treats an incomplete batch as a failed operation.
    async fn batch_write(&self, writes: Vec<WriteOp>) -> GatewayResult<BatchOutcome>;
}

const READ_RETRIES: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 50;
const RETRY_MAX_DELAY_MS: u64 = 400;

/// Retry a read with bounded exponential backoff on transient faults.
/// Writes are never routed through here: replaying a write can
/// double-apply a mutation.
pub async fn read_with_retry<T, F, Fut>(op: F) -> GatewayResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = GatewayResult<T>>,
{
    let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt + 1 < READ_RETRIES => {
                attempt += 1;
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transient store fault on read, retrying: {e}"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(Duration::from_millis(RETRY_MAX_DELAY_MS));
            }
            Err(e) => return Err(e),
        }
    }
}
