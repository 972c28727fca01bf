use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::authz::PermissionTables;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::routes::{health, permissions, roles};

#[derive(Clone)]
pub struct AppState {
    pub tables: Arc<PermissionTables>,
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    pub fn new(tables: PermissionTables, jwt: JwtConfig) -> Self {
        Self {
            tables: Arc::new(tables),
            jwt: Arc::new(jwt),
        }
    }
}

pub fn create_app(config: &AppConfig) -> Result<Router, AppError> {
    let tables = config.load_tables()?;
    let state = AppState::new(tables, config.jwt.clone());
    Ok(router(state))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/roles", get(roles::list_roles))
        .nest("/permissions", permissions::routes());

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
