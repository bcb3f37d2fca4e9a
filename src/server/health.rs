use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub sessions: usize,
}

pub struct HealthHandler;

impl HealthHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, sessions: usize) -> Response {
        let health = HealthStatus {
            status: "healthy".to_string(),
            service: "pagemarker".to_string(),
            sessions,
        };

        Json(health).into_response()
    }
}

impl Default for HealthHandler {
    fn default() -> Self {
        Self::new()
    }
}
