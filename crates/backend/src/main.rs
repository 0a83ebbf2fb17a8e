pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{configure_routes, AppState};
use crate::system::users::cache::DirectoryCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    tracing::info!("Database: {}", db_path.display());

    let db_path = db_path.to_string_lossy().to_string();
    shared::data::db::initialize_database(Some(db_path.as_str()))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;
    let db = shared::data::db::get_connection().clone();

    let jwt_secret =
        system::auth::jwt::resolve_secret(&db, config.auth.jwt_secret.as_deref()).await?;

    // Ensure admin user exists
    system::initialization::ensure_admin_user_exists(&db).await?;
    system::initialization::ensure_default_savings_rate(&db).await?;

    tracing::info!(
        "Import: limit {} bytes, {:?} transactions",
        config.import.max_upload_bytes,
        config.import.transaction_scope
    );

    let port = config.server.port;
    let state = AppState {
        db,
        config: Arc::new(config),
        cache: DirectoryCache::new(),
        jwt_secret: Arc::new(jwt_secret),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = configure_routes(state)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
