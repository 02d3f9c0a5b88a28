use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supabase_migrate::config::{Config, EnvFile};
use supabase_migrate::db;
use supabase_migrate::migrations::{self, MigrationFile};

const MIGRATIONS_DIR: &str = "supabase/migrations";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let env_file = EnvFile::load(Path::new(".env"));
    let config = match Config::resolve(&env_file) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    // Optional single-file mode: apply exactly the named file.
    let target = match std::env::args().nth(1) {
        None => None,
        Some(arg) => {
            let path = PathBuf::from(&arg);
            if !path.exists() {
                eprintln!("File not found: {arg}");
                return ExitCode::from(2);
            }
            match MigrationFile::from_path(&path) {
                Ok(migration) => Some(migration),
                Err(err) => {
                    eprintln!("{err}");
                    return ExitCode::from(2);
                }
            }
        }
    };

    match run(&config, target).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Connect, apply, and release the connection on every exit path.
async fn run(config: &Config, target: Option<MigrationFile>) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    let result = apply_all(&pool, target).await;
    pool.close().await;
    result
}

async fn apply_all(pool: &PgPool, target: Option<MigrationFile>) -> anyhow::Result<()> {
    let pending = match target {
        // Single-file mode skips the applied filter so an already-applied
        // version can be re-run; the tracking insert conflict-skips.
        Some(migration) => vec![migration],
        None => {
            let files = migrations::list_migration_files(Path::new(MIGRATIONS_DIR))?;
            let applied = db::tracking::fetch_applied_versions(pool).await?;
            migrations::pending(files, &applied)
        }
    };

    if pending.is_empty() {
        println!("No pending migrations.");
        return Ok(());
    }

    for migration in &pending {
        println!("Applying {} ({}) ...", migration.version, migration.file_name());
        db::tracking::apply_migration(pool, migration).await?;
    }
    println!("Applied {} migration(s).", pending.len());
    Ok(())
}
