//! Permit persistence.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use aduana_core::{OperationId, Permit, PermitStatus};
use aduana_ops::OperationEntry;

/// Replace the operation's permit rows.
pub async fn save(
    tx: &mut Transaction<'_, Postgres>,
    entry: &OperationEntry,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM permits WHERE operation_id = $1")
        .bind(entry.operation.id.as_uuid())
        .execute(&mut **tx)
        .await?;
    for permit in &entry.permits {
        sqlx::query(
            "INSERT INTO permits (id, operation_id, permit_type, status, reference,
             created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(permit.id.as_uuid())
        .bind(permit.operation_id.as_uuid())
        .bind(&permit.permit_type)
        .bind(permit.status.as_str())
        .bind(&permit.reference)
        .bind(permit.created_at)
        .bind(permit.updated_at)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct PermitRow {
    id: Uuid,
    operation_id: Uuid,
    permit_type: String,
    status: String,
    reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PermitRow {
    fn into_permit(self) -> Option<Permit> {
        let status = match PermitStatus::from_str(&self.status) {
            Ok(status) => status,
            Err(error) => {
                tracing::error!(%error, permit = %self.id, "skipping unparseable permit row");
                return None;
            }
        };
        Some(Permit {
            id: self.id.into(),
            operation_id: self.operation_id.into(),
            permit_type: self.permit_type,
            status,
            reference: self.reference,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Load all permit rows grouped by operation, creation order.
pub async fn load_grouped(
    pool: &PgPool,
) -> Result<HashMap<OperationId, Vec<Permit>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PermitRow>(
        "SELECT id, operation_id, permit_type, status, reference, created_at, updated_at
         FROM permits ORDER BY operation_id, created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<OperationId, Vec<Permit>> = HashMap::new();
    for row in rows {
        if let Some(permit) = row.into_permit() {
            grouped.entry(permit.operation_id).or_default().push(permit);
        }
    }
    Ok(grouped)
}
