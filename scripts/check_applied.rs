use std::path::Path;

use supabase_migrate::config::{Config, EnvFile};
use supabase_migrate::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = EnvFile::load(Path::new(".env"));
    let config = Config::resolve(&env_file)?;
    let pool = db::connect(&config).await?;

    println!("=== Applied migrations ===");
    let rows: Vec<(String, Option<String>)> = sqlx::query_as(
        "SELECT version, name FROM supabase_migrations.schema_migrations ORDER BY version",
    )
    .fetch_all(&pool)
    .await?;

    if rows.is_empty() {
        println!("(empty)");
    } else {
        for (version, name) in rows {
            println!("version: {}, name: {}", version, name.unwrap_or_default());
        }
    }

    pool.close().await;
    Ok(())
}
