//! # Declaration Service
//!
//! Registration (one declaration per type), the approval trail, DGA
//! submission, and preliquidation write-back. The approval and
//! submission actions compute transition hints: a final approval or a
//! DGA submission while the operation sits in
//! `DECLARATION_IN_PROGRESS` advances it to `SUBMITTED_TO_CUSTOMS`; a
//! rejection while in `PRELIQUIDATION_REVIEW` reverts the file to
//! `PENDING_CORRECTION` and clears the declaration's approvals.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use aduana_core::{
    Declaration, DeclarationId, DeclarationType, OperationId, OperationStatus, TariffLine,
};
use aduana_crossing::{calculate, PreliquidationTotals};

use crate::error::OpsError;
use crate::hints::TransitionHint;
use crate::ledger::DeclarationRecord;
use crate::lifecycle::OpsService;
use crate::sinks::AuditEvent;

// ─── Input Types ─────────────────────────────────────────────────────

/// Input for registering a declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationDraft {
    /// PRELIMINARY or FINAL.
    pub declaration_type: DeclarationType,
    /// Free-on-board value.
    pub fob_value: Option<Decimal>,
    /// Freight cost.
    pub freight_value: Option<Decimal>,
    /// Insurance cost.
    pub insurance_value: Option<Decimal>,
    /// CIF value, if already computed upstream.
    pub cif_value: Option<Decimal>,
    /// Taxable base, if already computed upstream.
    pub taxable_base: Option<Decimal>,
    /// Total taxes, if already computed upstream.
    pub total_taxes: Option<Decimal>,
    /// Tariff lines.
    #[serde(default)]
    pub lines: Vec<TariffLineDraft>,
}

/// Input for one tariff line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffLineDraft {
    /// Line number, unique within the declaration.
    pub line_number: u32,
    /// Harmonized tariff code.
    pub tariff_code: String,
    /// Goods description.
    pub description: String,
    /// Declared quantity.
    pub quantity: Option<Decimal>,
    /// Unit value.
    pub unit_value: Option<Decimal>,
    /// Total line value.
    pub total_value: Option<Decimal>,
    /// Applicable tax rate.
    pub tax_rate: Option<Decimal>,
    /// Computed tax amount.
    pub tax_amount: Option<Decimal>,
}

// ─── Service ─────────────────────────────────────────────────────────

impl OpsService {
    /// Register a declaration with its tariff lines. At most one
    /// declaration per (operation, type); line numbers must be unique
    /// within the declaration.
    pub fn register_declaration(
        &self,
        operation_id: OperationId,
        draft: DeclarationDraft,
        actor: &str,
    ) -> Result<Declaration, OpsError> {
        let declaration = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            if entry.declaration_of_type(draft.declaration_type).is_some() {
                return Err(OpsError::DuplicateDeclaration {
                    declaration_type: draft.declaration_type,
                });
            }

            let mut declaration = Declaration::new(operation_id, draft.declaration_type);
            declaration.fob_value = draft.fob_value;
            declaration.freight_value = draft.freight_value;
            declaration.insurance_value = draft.insurance_value;
            declaration.cif_value = draft.cif_value;
            declaration.taxable_base = draft.taxable_base;
            declaration.total_taxes = draft.total_taxes;

            let mut lines = Vec::with_capacity(draft.lines.len());
            for line in draft.lines {
                if lines
                    .iter()
                    .any(|existing: &TariffLine| existing.line_number == line.line_number)
                {
                    return Err(OpsError::DuplicateLineNumber {
                        line_number: line.line_number,
                    });
                }
                lines.push(TariffLine {
                    declaration_id: declaration.id,
                    line_number: line.line_number,
                    tariff_code: line.tariff_code,
                    description: line.description,
                    quantity: line.quantity,
                    unit_value: line.unit_value,
                    total_value: line.total_value,
                    tax_rate: line.tax_rate,
                    tax_amount: line.tax_amount,
                });
            }

            entry.declarations.push(DeclarationRecord {
                declaration: declaration.clone(),
                lines,
            });
            declaration
        };

        tracing::debug!(
            operation = %operation_id,
            declaration = %declaration.id,
            kind = %declaration.declaration_type,
            "declaration registered"
        );
        self.audit.record(AuditEvent::new(
            operation_id,
            "declaration.registered",
            actor,
            Some(declaration.declaration_type.to_string()),
        ));
        Ok(declaration)
    }

    /// The operation's declarations with their tariff lines.
    pub fn declarations(
        &self,
        operation_id: OperationId,
    ) -> Result<Vec<DeclarationRecord>, OpsError> {
        Ok(self.ledger.entry(operation_id)?.declarations.clone())
    }

    /// Grant the technical approval. No automatic transition.
    pub fn approve_technical(
        &self,
        operation_id: OperationId,
        declaration_id: DeclarationId,
        actor: &str,
    ) -> Result<Declaration, OpsError> {
        let declaration = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let record = entry
                .declaration_mut(declaration_id)
                .ok_or(OpsError::DeclarationNotFound(declaration_id))?;
            if record.declaration.has_technical_approval() {
                return Err(OpsError::AlreadyApproved);
            }
            let now = Utc::now();
            record.declaration.technical_approved_by = Some(actor.to_string());
            record.declaration.technical_approved_at = Some(now);
            record.declaration.updated_at = now;
            record.declaration.clone()
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "declaration.technical_approved",
            actor,
            None,
        ));
        Ok(declaration)
    }

    /// Grant the final approval. Granted while the operation sits in
    /// `DECLARATION_IN_PROGRESS`, it advances to
    /// `SUBMITTED_TO_CUSTOMS`.
    pub fn approve_final(
        &self,
        operation_id: OperationId,
        declaration_id: DeclarationId,
        actor: &str,
    ) -> Result<Declaration, OpsError> {
        let (declaration, committed) = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let record = entry
                .declaration_mut(declaration_id)
                .ok_or(OpsError::DeclarationNotFound(declaration_id))?;
            if record.declaration.has_final_approval() {
                return Err(OpsError::AlreadyApproved);
            }
            let now = Utc::now();
            record.declaration.final_approved_by = Some(actor.to_string());
            record.declaration.final_approved_at = Some(now);
            record.declaration.updated_at = now;
            let declaration = record.declaration.clone();

            let hint = (entry.operation.status == OperationStatus::DeclarationInProgress).then(
                || {
                    TransitionHint::new(
                        operation_id,
                        OperationStatus::DeclarationInProgress,
                        OperationStatus::SubmittedToCustoms,
                        actor,
                        "final approval granted; advancing to customs submission",
                    )
                },
            );
            let committed = Self::apply_hint(&mut entry, hint)?;
            (declaration, committed)
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "declaration.final_approved",
            actor,
            None,
        ));
        self.emit_optional(committed);
        Ok(declaration)
    }

    /// Reject the declaration, clearing both approvals. Rejected while
    /// the operation sits in `PRELIQUIDATION_REVIEW`, the file reverts
    /// to `PENDING_CORRECTION`.
    pub fn reject_declaration(
        &self,
        operation_id: OperationId,
        declaration_id: DeclarationId,
        actor: &str,
        reason: &str,
    ) -> Result<Declaration, OpsError> {
        let (declaration, committed) = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let record = entry
                .declaration_mut(declaration_id)
                .ok_or(OpsError::DeclarationNotFound(declaration_id))?;
            let now = Utc::now();
            record.declaration.rejected_by = Some(actor.to_string());
            record.declaration.rejected_at = Some(now);
            record.declaration.rejection_reason = Some(reason.to_string());
            record.declaration.clear_approvals();
            record.declaration.updated_at = now;
            let declaration = record.declaration.clone();

            let hint = (entry.operation.status == OperationStatus::PreliquidationReview).then(
                || {
                    TransitionHint::new(
                        operation_id,
                        OperationStatus::PreliquidationReview,
                        OperationStatus::PendingCorrection,
                        actor,
                        "declaration rejected; file returned for correction",
                    )
                },
            );
            let committed = Self::apply_hint(&mut entry, hint)?;
            (declaration, committed)
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "declaration.rejected",
            actor,
            Some(reason.to_string()),
        ));
        self.emit_optional(committed);
        Ok(declaration)
    }

    /// Submit the declaration to the DGA, recording the assigned
    /// reference. Submitted while the operation sits in
    /// `DECLARATION_IN_PROGRESS`, it advances to
    /// `SUBMITTED_TO_CUSTOMS`. A second submission is rejected.
    pub fn submit_to_dga(
        &self,
        operation_id: OperationId,
        declaration_id: DeclarationId,
        dga_reference: &str,
        actor: &str,
    ) -> Result<Declaration, OpsError> {
        let (declaration, committed) = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let record = entry
                .declaration_mut(declaration_id)
                .ok_or(OpsError::DeclarationNotFound(declaration_id))?;
            if record.declaration.is_submitted_to_dga() {
                return Err(OpsError::AlreadySubmitted);
            }
            let now = Utc::now();
            record.declaration.dga_reference = Some(dga_reference.to_string());
            record.declaration.submitted_to_dga_at = Some(now);
            record.declaration.updated_at = now;
            let declaration = record.declaration.clone();

            let hint = (entry.operation.status == OperationStatus::DeclarationInProgress).then(
                || {
                    TransitionHint::new(
                        operation_id,
                        OperationStatus::DeclarationInProgress,
                        OperationStatus::SubmittedToCustoms,
                        actor,
                        "declaration submitted to the DGA",
                    )
                },
            );
            let committed = Self::apply_hint(&mut entry, hint)?;
            (declaration, committed)
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "declaration.submitted_to_dga",
            actor,
            Some(dga_reference.to_string()),
        ));
        self.emit_optional(committed);
        Ok(declaration)
    }

    /// Recompute the preliquidation totals from the declaration's
    /// header and tariff lines and write them back onto the
    /// declaration.
    pub fn recompute_preliquidation(
        &self,
        operation_id: OperationId,
        declaration_id: DeclarationId,
        actor: &str,
    ) -> Result<PreliquidationTotals, OpsError> {
        let totals = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let record = entry
                .declaration_mut(declaration_id)
                .ok_or(OpsError::DeclarationNotFound(declaration_id))?;
            let totals = calculate(&record.declaration, &record.lines);
            record.declaration.cif_value = Some(totals.cif);
            record.declaration.taxable_base = Some(totals.taxable_base);
            record.declaration.total_taxes = Some(totals.total_taxes);
            record.declaration.updated_at = Utc::now();
            totals
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "declaration.preliquidation_computed",
            actor,
            Some(format!("cif={} taxes={}", totals.cif, totals.total_taxes)),
        ));
        Ok(totals)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
