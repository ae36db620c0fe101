//! SurrealDB Gateway
//!
//! [`Gateway`] over the embedded SurrealDB engine. Documents are plain
//! objects keyed by `type::thing(collection, id)`; record ids are cast to
//! strings on the way out so bodies stay JSON-safe. Batches run inside
//! one BEGIN/COMMIT transaction, which makes them atomic.

use async_trait::async_trait;
use serde_json::{Map, Value};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use super::gateway::{
    BatchOutcome, Document, Filter, Gateway, GatewayError, GatewayResult, WriteOp,
};

#[derive(Clone)]
pub struct SurrealGateway {
    db: Surreal<Db>,
}

impl SurrealGateway {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }
}

fn db_err(err: surrealdb::Error) -> GatewayError {
    GatewayError::Database(err.to_string())
}

/// "table:key" or "table:⟨key⟩" -> "key"
fn strip_table_prefix(rid: &str) -> String {
    let key = rid.split_once(':').map_or(rid, |(_, k)| k);
    key.trim_start_matches('⟨').trim_end_matches('⟩').to_string()
}

/// Field names are interpolated into WHERE clauses (values are always
/// bound), so they are restricted to plain identifiers.
fn ensure_ident(field: &str) -> GatewayResult<()> {
    let ok = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(GatewayError::Database(format!(
            "invalid filter field: {field}"
        )))
    }
}

/// A result row into a document: the `rid` alias becomes the key, the
/// native record id is dropped from the body.
fn row_to_document(mut row: Value) -> GatewayResult<Document> {
    let map = row
        .as_object_mut()
        .ok_or_else(|| GatewayError::Serde("row is not an object".to_string()))?;
    let rid = match map.remove("rid") {
        Some(Value::String(s)) => s,
        other => {
            return Err(GatewayError::Serde(format!(
                "missing record id in row: {other:?}"
            )));
        }
    };
    map.remove("id");
    Ok(Document::new(strip_table_prefix(&rid), row))
}

#[async_trait]
impl Gateway for SurrealGateway {
    async fn get_all(&self, collection: &str, filter: &Filter) -> GatewayResult<Vec<Document>> {
        let mut sql = String::from("SELECT *, <string>id AS rid FROM type::table($tb)");
        let mut params = Map::new();
        params.insert("tb".to_string(), Value::String(collection.to_string()));
        if !filter.is_empty() {
            sql.push_str(" WHERE ");
            for (i, (field, value)) in filter.clauses().iter().enumerate() {
                ensure_ident(field)?;
                if i > 0 {
                    sql.push_str(" AND ");
                }
                sql.push_str(&format!("{field} = $p{i}"));
                params.insert(format!("p{i}"), value.clone());
            }
        }
        let mut response = self.db.query(sql).bind(params).await.map_err(db_err)?;
        let rows: Vec<Value> = response.take(0).map_err(db_err)?;
        rows.into_iter().map(row_to_document).collect()
    }

    async fn get(&self, collection: &str, id: &str) -> GatewayResult<Option<Document>> {
        let mut response = self
            .db
            .query("SELECT *, <string>id AS rid FROM type::thing($tb, $id)")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .await
            .map_err(db_err)?;
        let rows: Vec<Value> = response.take(0).map_err(db_err)?;
        rows.into_iter().next().map(row_to_document).transpose()
    }

    async fn create(&self, collection: &str, doc: Document) -> GatewayResult<String> {
        let id = if doc.id.is_empty() {
            Uuid::new_v4().simple().to_string()
        } else {
            doc.id
        };
        self.db
            .query("CREATE type::thing($tb, $id) CONTENT $data RETURN NONE")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.clone()))
            .bind(("data", doc.data))
            .await
            .map_err(db_err)?
            .check()
            .map_err(db_err)?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> GatewayResult<()> {
        // UPDATE on a missing record is a silent no-op, so probe first
        if self.get(collection, id).await?.is_none() {
            return Err(GatewayError::NotFound(format!("{collection}:{id}")));
        }
        self.db
            .query("UPDATE type::thing($tb, $id) MERGE $data RETURN NONE")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .bind(("data", patch))
            .await
            .map_err(db_err)?
            .check()
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> GatewayResult<()> {
        self.db
            .query("DELETE type::thing($tb, $id)")
            .bind(("tb", collection.to_string()))
            .bind(("id", id.to_string()))
            .await
            .map_err(db_err)?
            .check()
            .map_err(db_err)?;
        Ok(())
    }

    async fn batch_write(&self, writes: Vec<WriteOp>) -> GatewayResult<BatchOutcome> {
        if writes.is_empty() {
            return Ok(BatchOutcome::Atomic);
        }
        let mut sql = String::from("BEGIN TRANSACTION;");
        let mut params = Map::new();
        for (i, op) in writes.into_iter().enumerate() {
            sql.push_str(&format!(
                " UPDATE type::thing($t{i}, $i{i}) MERGE $d{i} RETURN NONE;"
            ));
            params.insert(format!("t{i}"), Value::String(op.collection.to_string()));
            params.insert(format!("i{i}"), Value::String(op.id));
            params.insert(format!("d{i}"), op.patch);
        }
        sql.push_str(" COMMIT TRANSACTION;");
        self.db
            .query(sql)
            .bind(params)
            .await
            .map_err(db_err)?
            .check()
            .map_err(db_err)?;
        Ok(BatchOutcome::Atomic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_table_prefix_and_brackets() {
        assert_eq!(strip_table_prefix("category:abc123"), "abc123");
        assert_eq!(strip_table_prefix("product:⟨9-lives⟩"), "9-lives");
        assert_eq!(strip_table_prefix("bare"), "bare");
    }

    #[test]
    fn rejects_hostile_filter_fields() {
        assert!(ensure_ident("category_id").is_ok());
        assert!(ensure_ident("is_active").is_ok());
        assert!(ensure_ident("id = 1 OR 1=1; --").is_err());
        assert!(ensure_ident("").is_err());
    }
}
