mod config;
mod error;
mod handler;
mod middleware;
mod model;
mod route;
mod schema;
mod store;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use crate::{
    config::{Config, StoreConfig},
    middleware::AdminGate,
    store::{MySqlStore, SqliteStore, Store},
};

// Struct representing the application state
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Present only when an admin token is configured.
    pub admin: Option<AdminGate>,
}

// Entry point of the application
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classboard_server=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Connect to the database
    let store: Arc<dyn Store> = match &config.store {
        StoreConfig::MySql(db) => {
            let store = MySqlStore::connect(db)
                .await
                .with_context(|| format!("failed to connect to MySQL at {}:{}", db.host, db.port))?;
            info!("connected to MySQL at {}:{}", db.host, db.port);
            Arc::new(store)
        }
        StoreConfig::Sqlite { url } => {
            let store = SqliteStore::connect(url)
                .await
                .with_context(|| format!("failed to open {url}"))?;
            info!("connected to {}", url);
            Arc::new(store)
        }
    };

    let failed = store.init_schema().await;
    if !failed.is_empty() {
        error!(tables = ?failed, "schema initialization incomplete, continuing");
    }

    let admin = config.admin_token.as_deref().map(AdminGate::new);
    if admin.is_some() {
        warn!("admin token configured, /danger/clear-database is enabled");
    }

    let app_state = Arc::new(AppState { store, admin });
    let app = route::create_router(app_state);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("server running on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
