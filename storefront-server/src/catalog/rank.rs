//! Rank Ledger
//!
//! Dense-ordering engine behind the homepage showcase and the
//! per-category featured lists. A scope is the set of documents sharing
//! one rank sequence; its members hold ranks forming exactly 1..count.
//!
//! Mutations are planned against an in-memory snapshot of the scope and
//! submitted as a single batch, so an individual call either lands whole
//! or not at all. Two racing admin sessions can still interleave badly
//! (the store offers no cross-document locking); `repair` is the
//! counterpart: it renumbers whatever it finds back into a valid dense
//! permutation.

use std::sync::Arc;

use serde_json::{Value, json};

use super::{CatalogError, CatalogResult};
use crate::db::{BatchOutcome, Document, Filter, Gateway, GatewayError, WriteOp, read_with_retry};

/// One rank sequence: which documents participate and which fields carry
/// the membership flag and the rank.
#[derive(Debug, Clone)]
pub struct RankScope {
    pub collection: &'static str,
    /// Exact membership filter; documents outside it are never touched
    pub filter: Filter,
    pub flag_field: &'static str,
    pub rank_field: &'static str,
    /// Scope name used in limit errors, e.g. "showcase categories"
    pub label: &'static str,
    pub limit: u32,
}

/// Snapshot of one scoped document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEntry {
    pub id: String,
    pub rank: Option<u32>,
    /// Stable secondary key (creation time) for repair ordering
    pub seq: i64,
}

/// Planned mutation of one document's rank/flag fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankChange {
    pub id: String,
    /// New rank; None clears it
    pub rank: Option<u32>,
    /// Membership flag change carried with the rank write
    pub flag: Option<bool>,
}

fn entry_from_document(doc: &Document, scope: &RankScope) -> RankEntry {
    RankEntry {
        id: doc.id.clone(),
        rank: doc
            .data
            .get(scope.rank_field)
            .and_then(Value::as_u64)
            .map(|r| r as u32),
        seq: doc.data.get("created_at").and_then(Value::as_i64).unwrap_or(0),
    }
}

// =============================================================================
// Pure planning
// =============================================================================

/// Next free rank for `target`, or `LimitExceeded` when the scope is full.
/// Promoting a current member plans nothing and reports its rank as-is.
pub(crate) fn plan_promote(
    entries: &[RankEntry],
    target: &str,
    limit: u32,
    label: &str,
) -> CatalogResult<(u32, Vec<RankChange>)> {
    if let Some(existing) = entries.iter().find(|e| e.id == target) {
        let rank = existing.rank.unwrap_or(entries.len() as u32);
        return Ok((rank, Vec::new()));
    }
    let count = entries.len() as u32;
    if count >= limit {
        return Err(CatalogError::LimitExceeded {
            scope: label.to_string(),
            limit,
        });
    }
    let rank = count + 1;
    let changes = vec![RankChange {
        id: target.to_string(),
        rank: Some(rank),
        flag: Some(true),
    }];
    Ok((rank, changes))
}

/// Clear the target's rank and close the gap above it. A non-member
/// target plans nothing.
pub(crate) fn plan_demote(entries: &[RankEntry], target: &str) -> Vec<RankChange> {
    let Some(existing) = entries.iter().find(|e| e.id == target) else {
        return Vec::new();
    };
    let mut changes = vec![RankChange {
        id: target.to_string(),
        rank: None,
        flag: Some(false),
    }];
    if let Some(old) = existing.rank {
        for entry in entries {
            if entry.id != target
                && let Some(rank) = entry.rank
                && rank > old
            {
                changes.push(RankChange {
                    id: entry.id.clone(),
                    rank: Some(rank - 1),
                    flag: None,
                });
            }
        }
    }
    changes
}

/// Move the target to `new_rank`, shifting the block in between by one.
/// A same-rank move plans zero writes.
pub(crate) fn plan_reorder(
    entries: &[RankEntry],
    target: &str,
    new_rank: u32,
    label: &str,
) -> CatalogResult<Vec<RankChange>> {
    let count = entries.len() as u32;
    let existing = entries
        .iter()
        .find(|e| e.id == target)
        .ok_or_else(|| CatalogError::Validation(format!("{target} is not among the {label}")))?;
    if new_rank < 1 || new_rank > count {
        return Err(CatalogError::InvalidRank {
            rank: new_rank,
            count,
        });
    }
    let Some(old_rank) = existing.rank else {
        return Err(CatalogError::Validation(format!(
            "{target} holds no rank; run a repair first"
        )));
    };
    if new_rank == old_rank {
        return Ok(Vec::new());
    }

    let mut changes = Vec::new();
    for entry in entries {
        if entry.id == target {
            continue;
        }
        let Some(rank) = entry.rank else { continue };
        if new_rank < old_rank {
            // Moving up: the block [new_rank, old_rank-1] slides down one
            if rank >= new_rank && rank < old_rank {
                changes.push(RankChange {
                    id: entry.id.clone(),
                    rank: Some(rank + 1),
                    flag: None,
                });
            }
        } else {
            // Moving down: the block (old_rank, new_rank] slides up one
            if rank > old_rank && rank <= new_rank {
                changes.push(RankChange {
                    id: entry.id.clone(),
                    rank: Some(rank - 1),
                    flag: None,
                });
            }
        }
    }
    changes.push(RankChange {
        id: target.to_string(),
        rank: Some(new_rank),
        flag: None,
    });
    Ok(changes)
}

/// Renumber the scope into 1..count. Members are ordered by current rank,
/// rank-less members last, ties broken by creation time then id; only
/// documents whose rank actually changes are written, so a second run
/// plans nothing.
pub(crate) fn plan_repair(entries: &[RankEntry]) -> Vec<RankChange> {
    let mut ordered: Vec<&RankEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| {
        let a_key = (a.rank.is_none(), a.rank, a.seq, &a.id);
        let b_key = (b.rank.is_none(), b.rank, b.seq, &b.id);
        a_key.cmp(&b_key)
    });
    ordered
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let rank = i as u32 + 1;
            (entry.rank != Some(rank)).then(|| RankChange {
                id: entry.id.clone(),
                rank: Some(rank),
                flag: None,
            })
        })
        .collect()
}

// =============================================================================
// Ledger
// =============================================================================

/// Applies planned rank changes through the persistence gateway
#[derive(Clone)]
pub struct RankLedger {
    gateway: Arc<dyn Gateway>,
}

impl RankLedger {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    async fn load_entries(&self, scope: &RankScope) -> CatalogResult<Vec<RankEntry>> {
        let docs =
            read_with_retry(|| self.gateway.get_all(scope.collection, &scope.filter)).await?;
        Ok(docs.iter().map(|d| entry_from_document(d, scope)).collect())
    }

    async fn require_exists(&self, scope: &RankScope, id: &str) -> CatalogResult<()> {
        let found = read_with_retry(|| self.gateway.get(scope.collection, id)).await?;
        if found.is_none() {
            return Err(CatalogError::NotFound(format!(
                "{}:{id}",
                scope.collection
            )));
        }
        Ok(())
    }

    async fn submit(&self, scope: &RankScope, changes: Vec<RankChange>) -> CatalogResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let writes = changes
            .into_iter()
            .map(|change| {
                let mut patch = json!({ scope.rank_field: change.rank });
                if let (Some(flag), Some(map)) = (change.flag, patch.as_object_mut()) {
                    map.insert(scope.flag_field.to_string(), Value::Bool(flag));
                }
                WriteOp {
                    collection: scope.collection,
                    id: change.id,
                    patch,
                }
            })
            .collect();
        let outcome = self.gateway.batch_write(writes).await?;
        if let BatchOutcome::BestEffort { applied, failed } = outcome
            && failed > 0
        {
            return Err(CatalogError::Store(GatewayError::Partial {
                applied,
                failed,
            }));
        }
        Ok(())
    }

    /// Assign the next free rank. Returns the rank held after the call.
    pub async fn promote(&self, scope: &RankScope, id: &str) -> CatalogResult<u32> {
        self.require_exists(scope, id).await?;
        let entries = self.load_entries(scope).await?;
        let (rank, changes) = plan_promote(&entries, id, scope.limit, scope.label)?;
        self.submit(scope, changes).await?;
        tracing::info!(collection = scope.collection, id, rank, "promoted");
        Ok(rank)
    }

    /// Clear the rank and compact the sequence above it
    pub async fn demote(&self, scope: &RankScope, id: &str) -> CatalogResult<()> {
        self.require_exists(scope, id).await?;
        let entries = self.load_entries(scope).await?;
        let changes = plan_demote(&entries, id);
        if changes.is_empty() {
            return Ok(());
        }
        self.submit(scope, changes).await?;
        tracing::info!(collection = scope.collection, id, "demoted");
        Ok(())
    }

    /// Move a member to `new_rank`, shifting the members in between
    pub async fn reorder(&self, scope: &RankScope, id: &str, new_rank: u32) -> CatalogResult<()> {
        self.require_exists(scope, id).await?;
        let entries = self.load_entries(scope).await?;
        let changes = plan_reorder(&entries, id, new_rank, scope.label)?;
        if changes.is_empty() {
            return Ok(());
        }
        self.submit(scope, changes).await?;
        tracing::info!(collection = scope.collection, id, new_rank, "reordered");
        Ok(())
    }

    /// Renumber the scope into a valid dense permutation. Returns the
    /// member count.
    pub async fn repair(&self, scope: &RankScope) -> CatalogResult<u32> {
        let entries = self.load_entries(scope).await?;
        let changes = plan_repair(&entries);
        if !changes.is_empty() {
            tracing::warn!(
                collection = scope.collection,
                corrected = changes.len(),
                "rank sequence repaired"
            );
        }
        self.submit(scope, changes).await?;
        Ok(entries.len() as u32)
    }
}

// =============================================================================
// Tests
// =============================================================================
