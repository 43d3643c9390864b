//! # TaskForge API Server
//!
//! REST API for the TaskForge project/task tracker: registration and login,
//! project CRUD, team roster management, and per-project task lists, all
//! gated by the unified membership/authorization model in `taskforge-core`.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskforge \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p taskforge-api
//! ```

use std::sync::Arc;

use taskforge_api::{app::AppState, app::build_router, config::Config};
use taskforge_core::db::{migrations, pool};
use taskforge_core::store::{MembershipStore, PgMembershipStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskforge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskForge API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let bind_address = config.bind_address();

    let db_pool = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db_pool).await?;

    let store: Arc<dyn MembershipStore> = Arc::new(PgMembershipStore::new(db_pool));
    let state = AppState::new(store, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}
