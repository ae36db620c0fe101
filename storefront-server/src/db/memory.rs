//! In-Memory Gateway
//!
//! HashMap-backed [`Gateway`] used by the test suite and local demos.
//! Batches are applied under one lock after validating every target, so
//! the implementation is genuinely atomic. Mutation calls are counted,
//! which lets tests assert the zero-write guarantees of the rank ledger.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::gateway::{
    BatchOutcome, Document, Filter, Gateway, GatewayError, GatewayResult, WriteOp,
};

#[derive(Default)]
pub struct MemoryGateway {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
    writes: AtomicU64,
    fail_reads: AtomicU32,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of document mutations applied so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make the next `n` reads fail with a transient error
    pub fn fail_next_reads(&self, n: u32) {
        self.fail_reads.store(n, Ordering::SeqCst);
    }

    fn check_read_fault(&self) -> GatewayResult<()> {
        let remaining = self.fail_reads.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_reads.store(remaining - 1, Ordering::SeqCst);
            return Err(GatewayError::Unavailable("injected fault".to_string()));
        }
        Ok(())
    }

    fn merge(target: &mut Value, patch: &Value) {
        if let (Some(map), Some(patch_map)) = (target.as_object_mut(), patch.as_object()) {
            for (key, value) in patch_map {
                map.insert(key.clone(), value.clone());
            }
        }
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn get_all(&self, collection: &str, filter: &Filter) -> GatewayResult<Vec<Document>> {
        self.check_read_fault()?;
        let collections = self.collections.read().unwrap();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, data)| filter.matches(data))
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect())
    }

    async fn get(&self, collection: &str, id: &str) -> GatewayResult<Option<Document>> {
        self.check_read_fault()?;
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn create(&self, collection: &str, doc: Document) -> GatewayResult<String> {
        let id = if doc.id.is_empty() {
            Uuid::new_v4().simple().to_string()
        } else {
            doc.id
        };
        let mut collections = self.collections.write().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(GatewayError::Database(format!(
                "{collection}:{id} already exists"
            )));
        }
        docs.insert(id.clone(), doc.data);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> GatewayResult<()> {
        let mut collections = self.collections.write().unwrap();
        let data = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| GatewayError::NotFound(format!("{collection}:{id}")))?;
        Self::merge(data, &patch);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> GatewayResult<()> {
        let mut collections = self.collections.write().unwrap();
        if let Some(docs) = collections.get_mut(collection)
            && docs.remove(id).is_some()
        {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn batch_write(&self, writes: Vec<WriteOp>) -> GatewayResult<BatchOutcome> {
        let mut collections = self.collections.write().unwrap();
        // Validate every target before touching anything
        for op in &writes {
            let exists = collections
                .get(op.collection)
                .is_some_and(|docs| docs.contains_key(&op.id));
            if !exists {
                return Err(GatewayError::NotFound(format!(
                    "{}:{}",
                    op.collection, op.id
                )));
            }
        }
        for op in &writes {
            let data = collections
                .get_mut(op.collection)
                .and_then(|docs| docs.get_mut(&op.id))
                .expect("validated above");
            Self::merge(data, &op.patch);
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(BatchOutcome::Atomic)
    }
}
