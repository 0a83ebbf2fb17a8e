use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;

use crate::shared::config::Config;
use crate::system::auth::middleware::require_auth;
use crate::system::users::cache::DirectoryCache;
use crate::{handlers, system};

/// Room for the multipart envelope on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub cache: DirectoryCache,
    pub jwt_secret: Arc<String>,
}

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let body_limit = state.config.import.max_upload_bytes + MULTIPART_OVERHEAD;

    let protected = Router::new()
        // ========================================
        // U501 ROSTER IMPORT (admin only)
        // ========================================
        .route(
            "/api/u501/import/users",
            post(handlers::u501_import_roster::import_users),
        )
        .route(
            "/api/u501/import/members",
            post(handlers::u501_import_roster::import_members),
        )
        .route(
            "/api/u501/import/users/template",
            get(handlers::u501_import_roster::users_template),
        )
        .route(
            "/api/u501/import/members/template",
            get(handlers::u501_import_roster::members_template),
        )
        // ========================================
        // SYSTEM DIRECTORY
        // ========================================
        .route(
            "/api/system/users/by-staff/:staff_id",
            get(system::handlers::users::get_by_staff_id),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(protected)
        .with_state(state)
}
