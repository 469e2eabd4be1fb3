//! Operation and status history persistence.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use aduana_core::{
    InspectionType, Operation, OperationCategory, OperationId, OperationStatus, TransportMode,
};
use aduana_ops::OperationEntry;
use aduana_state::StatusHistoryRecord;

/// Upsert the operation row and replace its history rows.
pub async fn save(
    tx: &mut Transaction<'_, Postgres>,
    entry: &OperationEntry,
) -> Result<(), sqlx::Error> {
    let op = &entry.operation;
    sqlx::query(
        "INSERT INTO operations (id, reference, status, transport_mode, category,
         inspection_type, origin_country, original_bl_available, local_charges_validated,
         valuation_finalized_at, closed_at, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
         ON CONFLICT (id) DO UPDATE SET
           status = EXCLUDED.status,
           inspection_type = EXCLUDED.inspection_type,
           original_bl_available = EXCLUDED.original_bl_available,
           local_charges_validated = EXCLUDED.local_charges_validated,
           valuation_finalized_at = EXCLUDED.valuation_finalized_at,
           closed_at = EXCLUDED.closed_at,
           updated_at = EXCLUDED.updated_at",
    )
    .bind(op.id.as_uuid())
    .bind(&op.reference)
    .bind(op.status.as_str())
    .bind(op.transport_mode.as_str())
    .bind(op.category.as_str())
    .bind(op.inspection_type.map(|i| i.as_str()))
    .bind(&op.origin_country)
    .bind(op.original_bl_available)
    .bind(op.local_charges_validated)
    .bind(op.valuation_finalized_at)
    .bind(op.closed_at)
    .bind(op.created_at)
    .bind(op.updated_at)
    .execute(&mut **tx)
    .await?;

    sqlx::query("DELETE FROM status_history WHERE operation_id = $1")
        .bind(op.id.as_uuid())
        .execute(&mut **tx)
        .await?;
    for record in &entry.history {
        sqlx::query(
            "INSERT INTO status_history (operation_id, previous_status, new_status, actor,
             comment, timestamp)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(record.operation_id.as_uuid())
        .bind(record.previous_status.map(|s| s.as_str()))
        .bind(record.new_status.as_str())
        .bind(&record.actor)
        .bind(&record.comment)
        .bind(record.timestamp)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct OperationRow {
    id: Uuid,
    reference: String,
    status: String,
    transport_mode: String,
    category: String,
    inspection_type: Option<String>,
    origin_country: String,
    original_bl_available: bool,
    local_charges_validated: bool,
    valuation_finalized_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OperationRow {
    fn into_operation(self) -> Option<Operation> {
        let parse = || -> Result<Operation, aduana_core::EnumParseError> {
            Ok(Operation {
                id: self.id.into(),
                reference: self.reference,
                status: OperationStatus::from_str(&self.status)?,
                transport_mode: TransportMode::from_str(&self.transport_mode)?,
                category: OperationCategory::from_str(&self.category)?,
                inspection_type: self
                    .inspection_type
                    .as_deref()
                    .map(InspectionType::from_str)
                    .transpose()?,
                origin_country: self.origin_country,
                original_bl_available: self.original_bl_available,
                local_charges_validated: self.local_charges_validated,
                valuation_finalized_at: self.valuation_finalized_at,
                closed_at: self.closed_at,
                created_at: self.created_at,
                updated_at: self.updated_at,
            })
        };
        match parse() {
            Ok(operation) => Some(operation),
            Err(error) => {
                tracing::error!(%error, operation = %self.id, "skipping unparseable operation row");
                None
            }
        }
    }
}

/// Load all operation rows, oldest first.
pub async fn load_operations(pool: &PgPool) -> Result<Vec<Operation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, OperationRow>(
        "SELECT id, reference, status, transport_mode, category, inspection_type,
         origin_country, original_bl_available, local_charges_validated,
         valuation_finalized_at, closed_at, created_at, updated_at
         FROM operations ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().filter_map(OperationRow::into_operation).collect())
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    operation_id: Uuid,
    previous_status: Option<String>,
    new_status: String,
    actor: String,
    comment: Option<String>,
    timestamp: DateTime<Utc>,
}

impl HistoryRow {
    fn into_record(self) -> Option<StatusHistoryRecord> {
        let parse = || -> Result<StatusHistoryRecord, aduana_core::EnumParseError> {
            Ok(StatusHistoryRecord {
                operation_id: self.operation_id.into(),
                previous_status: self
                    .previous_status
                    .as_deref()
                    .map(OperationStatus::from_str)
                    .transpose()?,
                new_status: OperationStatus::from_str(&self.new_status)?,
                actor: self.actor,
                comment: self.comment,
                timestamp: self.timestamp,
            })
        };
        match parse() {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::error!(%error, operation = %self.operation_id, "skipping unparseable history row");
                None
            }
        }
    }
}

/// Load all history rows grouped by operation, oldest first.
pub async fn load_history(
    pool: &PgPool,
) -> Result<HashMap<OperationId, Vec<StatusHistoryRecord>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, HistoryRow>(
        "SELECT operation_id, previous_status, new_status, actor, comment, timestamp
         FROM status_history ORDER BY operation_id, timestamp, id",
    )
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<OperationId, Vec<StatusHistoryRecord>> = HashMap::new();
    for row in rows {
        if let Some(record) = row.into_record() {
            grouped.entry(record.operation_id).or_default().push(record);
        }
    }
    Ok(grouped)
}
