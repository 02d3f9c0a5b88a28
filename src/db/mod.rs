use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use crate::config::Config;

pub mod tracking;

/// Open a single encrypted connection to the configured database.
/// The connect phase is bounded by a 10 second timeout.
pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.dbname)
        .username(&config.user)
        .password(&config.password)
        .ssl_mode(PgSslMode::Require);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
        .with_context(|| {
            format!(
                "failed to connect to {}:{}/{}",
                config.host, config.port, config.dbname
            )
        })?;

    tracing::info!(host = %config.host, db = %config.dbname, "database connected");
    Ok(pool)
}
