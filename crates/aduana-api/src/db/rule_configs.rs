//! Compliance rule configuration persistence.

use sqlx::PgPool;

use aduana_compliance::InMemoryRuleConfigStore;

/// Replace the stored configuration with the store's current state.
pub async fn save_all(pool: &PgPool, store: &InMemoryRuleConfigStore) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM compliance_rule_flags")
        .execute(&mut *tx)
        .await?;
    for (rule_code, enabled) in store.enabled_flags() {
        sqlx::query("INSERT INTO compliance_rule_flags (rule_code, enabled) VALUES ($1, $2)")
            .bind(&rule_code)
            .bind(enabled)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("DELETE FROM compliance_rule_configs")
        .execute(&mut *tx)
        .await?;
    for rule_code in store.configured_rule_codes() {
        for (key, value) in store.params_for(&rule_code) {
            sqlx::query(
                "INSERT INTO compliance_rule_configs (rule_code, param_key, param_value)
                 VALUES ($1, $2, $3)",
            )
            .bind(&rule_code)
            .bind(&key)
            .bind(&value)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await
}

#[derive(sqlx::FromRow)]
struct FlagRow {
    rule_code: String,
    enabled: bool,
}

#[derive(sqlx::FromRow)]
struct ParamRow {
    rule_code: String,
    param_key: String,
    param_value: String,
}

/// Load the stored configuration into the in-memory store.
pub async fn load_all(pool: &PgPool, store: &InMemoryRuleConfigStore) -> Result<(), sqlx::Error> {
    let flags = sqlx::query_as::<_, FlagRow>(
        "SELECT rule_code, enabled FROM compliance_rule_flags",
    )
    .fetch_all(pool)
    .await?;
    for flag in flags {
        store.set_enabled(&flag.rule_code, flag.enabled);
    }

    let params = sqlx::query_as::<_, ParamRow>(
        "SELECT rule_code, param_key, param_value FROM compliance_rule_configs",
    )
    .fetch_all(pool)
    .await?;
    for param in params {
        store.set_value(&param.rule_code, &param.param_key, &param.param_value);
    }
    Ok(())
}
