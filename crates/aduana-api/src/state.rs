//! # Application State
//!
//! Shared state for the Axum application: the operation service, the
//! compliance engine with its rule configuration store, the optional
//! Postgres pool, and the environment-driven configuration.
//!
//! Postgres is a mirror, not the source of truth at runtime: every
//! mutation commits in memory first and is then written through to the
//! pool when one is configured. A write-through failure is logged, it
//! never rolls back the in-memory commit.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;

use aduana_compliance::{ComplianceEngine, InMemoryRuleConfigStore};
use aduana_core::OperationId;
use aduana_ops::{InMemoryAuditSink, InMemoryNotificationSink, OpsService};

use crate::db;

/// Environment-driven API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address, `ADUANA_BIND_ADDR` (default `0.0.0.0:8080`).
    pub bind_addr: String,
    /// Optional bearer token, `ADUANA_AUTH_TOKEN`. Absent means the
    /// API is open (development mode).
    pub auth_token: Option<String>,
    /// Whether the Prometheus endpoint is mounted,
    /// `ADUANA_METRICS_ENABLED` (default true).
    pub metrics_enabled: bool,
}

impl ApiConfig {
    /// Read the configuration from the environment.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("ADUANA_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let auth_token = std::env::var("ADUANA_AUTH_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());
        let metrics_enabled = std::env::var("ADUANA_METRICS_ENABLED")
            .map(|value| value.to_lowercase() != "false")
            .unwrap_or(true);
        Self {
            bind_addr,
            auth_token,
            metrics_enabled,
        }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// The operation lifecycle service and its ledger.
    pub ops: Arc<OpsService>,
    /// The compliance engine (full built-in rule catalogue).
    pub engine: Arc<ComplianceEngine>,
    /// Rule enable/disable flags and parameters.
    pub rules: Arc<InMemoryRuleConfigStore>,
    /// Optional Postgres mirror.
    pub db: Option<PgPool>,
    /// Prometheus scrape handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Build the state around a fresh in-memory service.
    pub fn new(config: ApiConfig, db: Option<PgPool>, metrics: Option<PrometheusHandle>) -> Self {
        let ops = Arc::new(OpsService::new(
            Arc::new(InMemoryNotificationSink::new()),
            Arc::new(InMemoryAuditSink::new()),
        ));
        Self {
            ops,
            engine: Arc::new(ComplianceEngine::new()),
            rules: Arc::new(InMemoryRuleConfigStore::new()),
            db,
            metrics,
            config,
        }
    }

    /// Write one operation aggregate through to Postgres, if
    /// configured. Failures are logged; the in-memory commit stands.
    pub async fn persist(&self, id: OperationId) {
        let Some(pool) = &self.db else {
            return;
        };
        match self.ops.snapshot(id) {
            Ok(entry) => {
                if let Err(error) = db::save_entry(pool, &entry).await {
                    tracing::error!(%error, operation = %id, "operation write-through failed");
                }
            }
            // Deleted between commit and write-through; the delete path
            // mirrors its own removal.
            Err(_) => {}
        }
    }

    /// Mirror an operation deletion.
    pub async fn persist_delete(&self, id: OperationId) {
        let Some(pool) = &self.db else {
            return;
        };
        if let Err(error) = db::delete_entry(pool, id).await {
            tracing::error!(%error, operation = %id, "operation delete write-through failed");
        }
    }

    /// Mirror the rule configuration store.
    pub async fn persist_rules(&self) {
        let Some(pool) = &self.db else {
            return;
        };
        if let Err(error) = db::rule_configs::save_all(pool, &self.rules).await {
            tracing::error!(%error, "rule config write-through failed");
        }
    }

    /// Hydrate the in-memory stores from Postgres on startup.
    pub async fn hydrate_from_db(&self) -> Result<(), sqlx::Error> {
        let Some(pool) = &self.db else {
            return Ok(());
        };
        let entries = db::load_all(pool).await?;
        let count = entries.len();
        for entry in entries {
            if let Err(error) = self.ops.ledger().insert(entry) {
                tracing::error!(%error, "skipping persisted operation during hydration");
            }
        }
        db::rule_configs::load_all(pool, &self.rules).await?;
        tracing::info!(operations = count, "hydrated in-memory state from database");
        Ok(())
    }
}
