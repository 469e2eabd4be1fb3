//! Document persistence.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use aduana_core::{Document, DocumentStatus, DocumentType, OperationId};
use aduana_ops::OperationEntry;

/// Replace the operation's document rows.
pub async fn save(
    tx: &mut Transaction<'_, Postgres>,
    entry: &OperationEntry,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM documents WHERE operation_id = $1")
        .bind(entry.operation.id.as_uuid())
        .execute(&mut **tx)
        .await?;
    for document in &entry.documents {
        sqlx::query(
            "INSERT INTO documents (id, operation_id, document_type, status, active,
             file_name, uploaded_by, uploaded_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(document.id.as_uuid())
        .bind(document.operation_id.as_uuid())
        .bind(document.document_type.as_str())
        .bind(document.status.as_str())
        .bind(document.active)
        .bind(&document.file_name)
        .bind(&document.uploaded_by)
        .bind(document.uploaded_at)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    operation_id: Uuid,
    document_type: String,
    status: String,
    active: bool,
    file_name: String,
    uploaded_by: String,
    uploaded_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self) -> Option<Document> {
        let parse = || -> Result<Document, aduana_core::EnumParseError> {
            Ok(Document {
                id: self.id.into(),
                operation_id: self.operation_id.into(),
                document_type: DocumentType::from_str(&self.document_type)?,
                status: DocumentStatus::from_str(&self.status)?,
                active: self.active,
                file_name: self.file_name,
                uploaded_by: self.uploaded_by,
                uploaded_at: self.uploaded_at,
            })
        };
        match parse() {
            Ok(document) => Some(document),
            Err(error) => {
                tracing::error!(%error, document = %self.id, "skipping unparseable document row");
                None
            }
        }
    }
}

/// Load all document rows grouped by operation, upload order.
pub async fn load_grouped(
    pool: &PgPool,
) -> Result<HashMap<OperationId, Vec<Document>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        "SELECT id, operation_id, document_type, status, active, file_name, uploaded_by,
         uploaded_at
         FROM documents ORDER BY operation_id, uploaded_at",
    )
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<OperationId, Vec<Document>> = HashMap::new();
    for row in rows {
        if let Some(document) = row.into_document() {
            grouped
                .entry(document.operation_id)
                .or_default()
                .push(document);
        }
    }
    Ok(grouped)
}
