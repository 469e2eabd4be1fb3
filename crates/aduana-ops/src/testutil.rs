//! Shared test fixtures for the service modules.

use std::sync::Arc;

use aduana_core::{OperationCategory, OperationId, OperationStatus, TransportMode};

use crate::lifecycle::OpsService;
use crate::sinks::{InMemoryAuditSink, InMemoryNotificationSink};

/// A fresh service with recording sinks.
pub(crate) fn service() -> (OpsService, Arc<InMemoryNotificationSink>, Arc<InMemoryAuditSink>) {
    let notifications = Arc::new(InMemoryNotificationSink::new());
    let audit = Arc::new(InMemoryAuditSink::new());
    let service = OpsService::new(notifications.clone(), audit.clone());
    (service, notifications, audit)
}

/// Create an AIR / CATEGORY_1 operation from Brazil.
pub(crate) fn create(service: &OpsService, reference: &str) -> OperationId {
    service
        .create_operation(
            reference,
            TransportMode::Air,
            OperationCategory::Category1,
            "BR",
            "intake",
        )
        .unwrap()
        .id
}

/// Walk an operation along a status path without compliance checks.
pub(crate) fn walk(service: &OpsService, id: OperationId, path: &[OperationStatus]) {
    for status in path {
        service.change_status(id, *status, "test", None).unwrap();
    }
}

/// The happy path from DRAFT up to (and including) the given status.
pub(crate) fn walk_to(service: &OpsService, id: OperationId, target: OperationStatus) {
    use OperationStatus::*;
    let path = [
        DocumentationComplete,
        InReview,
        PreliquidationReview,
        AnalystAssigned,
        DeclarationInProgress,
        SubmittedToCustoms,
        ValuationReview,
        PaymentPreparation,
        InTransit,
        Closed,
    ];
    for status in path {
        walk(service, id, &[status]);
        if status == target {
            return;
        }
    }
}
