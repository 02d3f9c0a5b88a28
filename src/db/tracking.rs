use std::collections::HashSet;

use anyhow::Context;
use sqlx::PgPool;

use crate::migrations::MigrationFile;

/// Versions already recorded in `supabase_migrations.schema_migrations`.
pub async fn fetch_applied_versions(pool: &PgPool) -> anyhow::Result<HashSet<String>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT version FROM supabase_migrations.schema_migrations")
            .fetch_all(pool)
            .await
            .context("fetch applied versions")?;
    tracing::debug!(count = rows.len(), "applied versions fetched");
    Ok(rows.into_iter().map(|(v,)| v).collect())
}

/// Execute a migration's SQL body and record its version, in one transaction.
/// The tracking insert skips silently if the version is already recorded.
pub async fn apply_migration(pool: &PgPool, migration: &MigrationFile) -> anyhow::Result<()> {
    let sql = std::fs::read_to_string(&migration.path)
        .with_context(|| format!("read {}", migration.path.display()))?;

    let mut tx = pool.begin().await.context("begin transaction")?;
    sqlx::raw_sql(&sql)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("execute {}", migration.file_name()))?;
    sqlx::query(
        "INSERT INTO supabase_migrations.schema_migrations (version, name, statements) \
         VALUES ($1, $2, NULL) \
         ON CONFLICT (version) DO NOTHING",
    )
    .bind(&migration.version)
    .bind(&migration.name)
    .execute(&mut *tx)
    .await
    .with_context(|| format!("record version {}", migration.version))?;
    tx.commit().await.context("commit transaction")?;

    tracing::debug!(version = %migration.version, "migration applied");
    Ok(())
}
