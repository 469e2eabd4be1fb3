//! Declaration and tariff line persistence.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use aduana_core::{Declaration, DeclarationType, OperationId, TariffLine};
use aduana_ops::{DeclarationRecord, OperationEntry};

/// Replace the operation's declaration rows and their lines.
pub async fn save(
    tx: &mut Transaction<'_, Postgres>,
    entry: &OperationEntry,
) -> Result<(), sqlx::Error> {
    // Tariff lines cascade with their declarations.
    sqlx::query("DELETE FROM declarations WHERE operation_id = $1")
        .bind(entry.operation.id.as_uuid())
        .execute(&mut **tx)
        .await?;

    for record in &entry.declarations {
        let decl = &record.declaration;
        sqlx::query(
            "INSERT INTO declarations (id, operation_id, declaration_type, fob_value,
             freight_value, insurance_value, cif_value, taxable_base, total_taxes,
             technical_approved_by, technical_approved_at, final_approved_by,
             final_approved_at, rejected_by, rejected_at, rejection_reason, dga_reference,
             submitted_to_dga_at, gatt_form_completed, gatt_adjustments, created_at,
             updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                     $16, $17, $18, $19, $20, $21, $22)",
        )
        .bind(decl.id.as_uuid())
        .bind(decl.operation_id.as_uuid())
        .bind(decl.declaration_type.as_str())
        .bind(decl.fob_value)
        .bind(decl.freight_value)
        .bind(decl.insurance_value)
        .bind(decl.cif_value)
        .bind(decl.taxable_base)
        .bind(decl.total_taxes)
        .bind(&decl.technical_approved_by)
        .bind(decl.technical_approved_at)
        .bind(&decl.final_approved_by)
        .bind(decl.final_approved_at)
        .bind(&decl.rejected_by)
        .bind(decl.rejected_at)
        .bind(&decl.rejection_reason)
        .bind(&decl.dga_reference)
        .bind(decl.submitted_to_dga_at)
        .bind(decl.gatt_form_completed)
        .bind(decl.gatt_adjustments)
        .bind(decl.created_at)
        .bind(decl.updated_at)
        .execute(&mut **tx)
        .await?;

        for line in &record.lines {
            sqlx::query(
                "INSERT INTO tariff_lines (declaration_id, line_number, tariff_code,
                 description, quantity, unit_value, total_value, tax_rate, tax_amount)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(line.declaration_id.as_uuid())
            .bind(line.line_number as i32)
            .bind(&line.tariff_code)
            .bind(&line.description)
            .bind(line.quantity)
            .bind(line.unit_value)
            .bind(line.total_value)
            .bind(line.tax_rate)
            .bind(line.tax_amount)
            .execute(&mut **tx)
            .await?;
        }
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct DeclarationRow {
    id: Uuid,
    operation_id: Uuid,
    declaration_type: String,
    fob_value: Option<Decimal>,
    freight_value: Option<Decimal>,
    insurance_value: Option<Decimal>,
    cif_value: Option<Decimal>,
    taxable_base: Option<Decimal>,
    total_taxes: Option<Decimal>,
    technical_approved_by: Option<String>,
    technical_approved_at: Option<DateTime<Utc>>,
    final_approved_by: Option<String>,
    final_approved_at: Option<DateTime<Utc>>,
    rejected_by: Option<String>,
    rejected_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    dga_reference: Option<String>,
    submitted_to_dga_at: Option<DateTime<Utc>>,
    gatt_form_completed: bool,
    gatt_adjustments: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DeclarationRow {
    fn into_declaration(self) -> Option<Declaration> {
        let declaration_type = match DeclarationType::from_str(&self.declaration_type) {
            Ok(kind) => kind,
            Err(error) => {
                tracing::error!(%error, declaration = %self.id, "skipping unparseable declaration row");
                return None;
            }
        };
        Some(Declaration {
            id: self.id.into(),
            operation_id: self.operation_id.into(),
            declaration_type,
            fob_value: self.fob_value,
            freight_value: self.freight_value,
            insurance_value: self.insurance_value,
            cif_value: self.cif_value,
            taxable_base: self.taxable_base,
            total_taxes: self.total_taxes,
            technical_approved_by: self.technical_approved_by,
            technical_approved_at: self.technical_approved_at,
            final_approved_by: self.final_approved_by,
            final_approved_at: self.final_approved_at,
            rejected_by: self.rejected_by,
            rejected_at: self.rejected_at,
            rejection_reason: self.rejection_reason,
            dga_reference: self.dga_reference,
            submitted_to_dga_at: self.submitted_to_dga_at,
            gatt_form_completed: self.gatt_form_completed,
            gatt_adjustments: self.gatt_adjustments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TariffLineRow {
    declaration_id: Uuid,
    line_number: i32,
    tariff_code: String,
    description: String,
    quantity: Option<Decimal>,
    unit_value: Option<Decimal>,
    total_value: Option<Decimal>,
    tax_rate: Option<Decimal>,
    tax_amount: Option<Decimal>,
}

impl TariffLineRow {
    fn into_line(self) -> TariffLine {
        TariffLine {
            declaration_id: self.declaration_id.into(),
            line_number: self.line_number as u32,
            tariff_code: self.tariff_code,
            description: self.description,
            quantity: self.quantity,
            unit_value: self.unit_value,
            total_value: self.total_value,
            tax_rate: self.tax_rate,
            tax_amount: self.tax_amount,
        }
    }
}

/// Load all declarations with their lines, grouped by operation.
pub async fn load_grouped(
    pool: &PgPool,
) -> Result<HashMap<OperationId, Vec<DeclarationRecord>>, sqlx::Error> {
    let line_rows = sqlx::query_as::<_, TariffLineRow>(
        "SELECT declaration_id, line_number, tariff_code, description, quantity,
         unit_value, total_value, tax_rate, tax_amount
         FROM tariff_lines ORDER BY declaration_id, line_number",
    )
    .fetch_all(pool)
    .await?;
    let mut lines_by_declaration: HashMap<Uuid, Vec<TariffLine>> = HashMap::new();
    for row in line_rows {
        lines_by_declaration
            .entry(row.declaration_id)
            .or_default()
            .push(row.into_line());
    }

    let rows = sqlx::query_as::<_, DeclarationRow>(
        "SELECT id, operation_id, declaration_type, fob_value, freight_value,
         insurance_value, cif_value, taxable_base, total_taxes, technical_approved_by,
         technical_approved_at, final_approved_by, final_approved_at, rejected_by,
         rejected_at, rejection_reason, dga_reference, submitted_to_dga_at,
         gatt_form_completed, gatt_adjustments, created_at, updated_at
         FROM declarations ORDER BY operation_id, created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<OperationId, Vec<DeclarationRecord>> = HashMap::new();
    for row in rows {
        let raw_id = row.id;
        if let Some(declaration) = row.into_declaration() {
            let lines = lines_by_declaration.remove(&raw_id).unwrap_or_default();
            grouped
                .entry(declaration.operation_id)
                .or_default()
                .push(DeclarationRecord { declaration, lines });
        }
    }
    Ok(grouped)
}
