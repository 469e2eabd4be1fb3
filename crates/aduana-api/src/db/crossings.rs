//! Crossing result and discrepancy persistence.
//!
//! An operation stores at most one crossing result; a re-execution
//! supersedes the stored row and its discrepancies wholesale, matching
//! the in-memory semantics.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use aduana_core::OperationId;
use aduana_crossing::{CrossingDiscrepancy, CrossingResult, CrossingStatus, DiscrepancyField};
use aduana_ops::OperationEntry;

/// Replace the operation's crossing rows.
pub async fn save(
    tx: &mut Transaction<'_, Postgres>,
    entry: &OperationEntry,
) -> Result<(), sqlx::Error> {
    // Discrepancies cascade with the result row.
    sqlx::query("DELETE FROM crossing_results WHERE operation_id = $1")
        .bind(entry.operation.id.as_uuid())
        .execute(&mut **tx)
        .await?;

    let Some(result) = &entry.crossing else {
        return Ok(());
    };

    sqlx::query(
        "INSERT INTO crossing_results (id, operation_id, status, executed_by, executed_at,
         resolved_by, resolved_at, resolution_comment)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(result.id.as_uuid())
    .bind(result.operation_id.as_uuid())
    .bind(result.status.as_str())
    .bind(&result.executed_by)
    .bind(result.executed_at)
    .bind(&result.resolved_by)
    .bind(result.resolved_at)
    .bind(&result.resolution_comment)
    .execute(&mut **tx)
    .await?;

    for discrepancy in &result.discrepancies {
        sqlx::query(
            "INSERT INTO crossing_discrepancies (crossing_id, field, line_number,
             tariff_code, preliminary_value, final_value, difference)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(result.id.as_uuid())
        .bind(discrepancy.field.as_str())
        .bind(discrepancy.line_number.map(|n| n as i32))
        .bind(&discrepancy.tariff_code)
        .bind(&discrepancy.preliminary_value)
        .bind(&discrepancy.final_value)
        .bind(discrepancy.difference)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct CrossingRow {
    id: Uuid,
    operation_id: Uuid,
    status: String,
    executed_by: String,
    executed_at: DateTime<Utc>,
    resolved_by: Option<String>,
    resolved_at: Option<DateTime<Utc>>,
    resolution_comment: Option<String>,
}

#[derive(sqlx::FromRow)]
struct DiscrepancyRow {
    crossing_id: Uuid,
    field: String,
    line_number: Option<i32>,
    tariff_code: Option<String>,
    preliminary_value: String,
    final_value: String,
    difference: Option<Decimal>,
}

impl DiscrepancyRow {
    fn into_discrepancy(self) -> Option<CrossingDiscrepancy> {
        let field = match DiscrepancyField::from_str(&self.field) {
            Ok(field) => field,
            Err(error) => {
                tracing::error!(%error, crossing = %self.crossing_id, "skipping unparseable discrepancy row");
                return None;
            }
        };
        Some(CrossingDiscrepancy {
            field,
            line_number: self.line_number.map(|n| n as u32),
            tariff_code: self.tariff_code,
            preliminary_value: self.preliminary_value,
            final_value: self.final_value,
            difference: self.difference,
        })
    }
}

/// Load all crossing results keyed by operation.
pub async fn load_grouped(
    pool: &PgPool,
) -> Result<HashMap<OperationId, CrossingResult>, sqlx::Error> {
    let discrepancy_rows = sqlx::query_as::<_, DiscrepancyRow>(
        "SELECT crossing_id, field, line_number, tariff_code, preliminary_value,
         final_value, difference
         FROM crossing_discrepancies ORDER BY crossing_id, id",
    )
    .fetch_all(pool)
    .await?;
    let mut discrepancies: HashMap<Uuid, Vec<CrossingDiscrepancy>> = HashMap::new();
    for row in discrepancy_rows {
        let crossing_id = row.crossing_id;
        if let Some(discrepancy) = row.into_discrepancy() {
            discrepancies.entry(crossing_id).or_default().push(discrepancy);
        }
    }

    let rows = sqlx::query_as::<_, CrossingRow>(
        "SELECT id, operation_id, status, executed_by, executed_at, resolved_by,
         resolved_at, resolution_comment
         FROM crossing_results",
    )
    .fetch_all(pool)
    .await?;

    let mut grouped = HashMap::new();
    for row in rows {
        let status = match CrossingStatus::from_str(&row.status) {
            Ok(status) => status,
            Err(error) => {
                tracing::error!(%error, crossing = %row.id, "skipping unparseable crossing row");
                continue;
            }
        };
        let result = CrossingResult {
            id: row.id.into(),
            operation_id: row.operation_id.into(),
            status,
            discrepancies: discrepancies.remove(&row.id).unwrap_or_default(),
            executed_by: row.executed_by,
            executed_at: row.executed_at,
            resolved_by: row.resolved_by,
            resolved_at: row.resolved_at,
            resolution_comment: row.resolution_comment,
        };
        grouped.insert(result.operation_id, result);
    }
    Ok(grouped)
}
