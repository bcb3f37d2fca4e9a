use std::sync::Arc;

use axum::extract::State;
use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::config::ConfigStore;
use crate::server::health::HealthHandler;
use crate::server::pages;
use crate::server::session::session_middleware;
use crate::session::MemorySessions;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: ConfigStore,
    pub sessions: MemorySessions,
    /// Port the server listens on; used when a request names no host.
    pub listen_port: Option<u16>,
    health: Arc<HealthHandler>,
}

impl AppState {
    pub fn new(config: ConfigStore, sessions: MemorySessions, listen_port: Option<u16>) -> Self {
        Self {
            config,
            sessions,
            listen_port,
            health: Arc::new(HealthHandler::new()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/products", get(pages::products))
        .route("/orders/list.html", get(pages::orders))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .route("/", get(pages::index))
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Response {
    state.health.handle(state.sessions.len())
}
