pub(crate) mod models;
pub(crate) mod types;

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

use crate::core::config::Settings;

pub(crate) async fn init_pool(settings: &Settings) -> anyhow::Result<PgPool> {
    let url = settings.database().database_url();
    let options = PgConnectOptions::from_str(&url)
        .context("Invalid database URL")?
        .application_name("kuis-rust")
        .log_statements(tracing::log::LevelFilter::Debug);

    let pool = PgPoolOptions::new()
        .max_connections(30)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .context("Failed to connect to Postgres")?;

    Ok(pool)
}

pub(crate) async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await.context("Failed to run database migrations")?;
    Ok(())
}
