//! # Database Persistence Layer
//!
//! Optional Postgres mirror of the in-memory ledger via SQLx.
//!
//! When `DATABASE_URL` is set, every committed mutation writes the full
//! operation aggregate through to Postgres and the API hydrates its
//! in-memory state from the tables on startup. When absent, the API
//! runs in-memory only.
//!
//! Write-through is aggregate-wise: `save_entry` upserts the operation
//! row and replaces all satellite rows (history, documents,
//! declarations with lines, permits, crossing) in one transaction, so
//! the mirror always holds a consistent aggregate.

pub mod crossings;
pub mod declarations;
pub mod documents;
pub mod operations;
pub mod permits;
pub mod rule_configs;

use sqlx::postgres::{PgPool, PgPoolOptions};

use aduana_core::OperationId;
use aduana_ops::OperationEntry;

/// Initialize the connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration
/// fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Write one operation aggregate through, replacing the stored copy.
pub async fn save_entry(pool: &PgPool, entry: &OperationEntry) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    operations::save(&mut tx, entry).await?;
    documents::save(&mut tx, entry).await?;
    declarations::save(&mut tx, entry).await?;
    permits::save(&mut tx, entry).await?;
    crossings::save(&mut tx, entry).await?;
    tx.commit().await
}

/// Remove one operation aggregate. Satellite rows cascade.
pub async fn delete_entry(pool: &PgPool, id: OperationId) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM operations WHERE id = $1")
        .bind(id.as_uuid())
        .execute(pool)
        .await?;
    Ok(())
}

/// Load every stored aggregate, oldest operation first.
///
/// Rows that no longer parse (unknown enum names after a bad manual
/// edit) drop the affected aggregate with an error log rather than
/// failing the whole hydration.
pub async fn load_all(pool: &PgPool) -> Result<Vec<OperationEntry>, sqlx::Error> {
    let operations = operations::load_operations(pool).await?;
    let mut history = operations::load_history(pool).await?;
    let mut documents = documents::load_grouped(pool).await?;
    let mut declarations = declarations::load_grouped(pool).await?;
    let mut permits = permits::load_grouped(pool).await?;
    let mut crossings = crossings::load_grouped(pool).await?;

    let mut entries = Vec::with_capacity(operations.len());
    for operation in operations {
        let id = operation.id;
        let mut entry = OperationEntry::new(operation);
        entry.history = history.remove(&id).unwrap_or_default();
        entry.documents = documents.remove(&id).unwrap_or_default();
        entry.declarations = declarations.remove(&id).unwrap_or_default();
        entry.permits = permits.remove(&id).unwrap_or_default();
        entry.crossing = crossings.remove(&id);
        entries.push(entry);
    }
    Ok(entries)
}
