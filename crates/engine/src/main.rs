//! Preflight binary: migrate, rebuild, and validate persisted state.
//!
//! Connects to the database, applies migrations, then rebuilds every
//! workspace's queue and ledger exactly the way the serving process
//! will — surfacing any workspace whose rows cannot form a valid queue
//! before a transport is ever attached. Exits non-zero if any
//! workspace is refused.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brigade_db::{PgStore, Store};
use brigade_engine::{Engine, EngineConfig, EngineError, InviteMailer, MailerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brigade_engine=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = EngineConfig::from_env();
    tracing::info!(?config, "loaded engine configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = brigade_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    brigade_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("database health check passed");

    brigade_db::run_migrations(&pool)
        .await
        .expect("Failed to apply migrations");
    tracing::info!("migrations applied");

    // --- Engine ---
    let store = Arc::new(PgStore::new(pool));
    let mut engine = Engine::new(store.clone(), config);
    if let Some(mailer_config) = MailerConfig::from_env() {
        let mailer = InviteMailer::new(mailer_config).expect("Failed to build SMTP mailer");
        engine = engine.with_mailer(mailer);
        tracing::info!("SMTP invitation mailer configured");
    }

    // --- Rebuild & validate every workspace ---
    let workspace_ids = store
        .list_workspace_ids()
        .await
        .expect("Failed to list workspaces");
    tracing::info!(workspaces = workspace_ids.len(), "validating persisted state");

    let mut refused = 0usize;
    for workspace_id in workspace_ids {
        match engine.list_queue(workspace_id).await {
            Ok(queue) => {
                let history = engine
                    .list_history(workspace_id)
                    .await
                    .map(|h| h.len())
                    .unwrap_or(0);
                tracing::info!(workspace_id, queued = queue.len(), history, "workspace ready");
            }
            Err(EngineError::CorruptState(msg)) => {
                refused += 1;
                tracing::error!(workspace_id, error = %msg, "workspace refused");
            }
            Err(e) => {
                refused += 1;
                tracing::error!(workspace_id, error = %e, "workspace validation failed");
            }
        }
    }

    if refused > 0 {
        tracing::error!(refused, "preflight failed");
        std::process::exit(1);
    }
    tracing::info!("preflight passed");
}
