//! Session cookie middleware and the `Marker` extractor.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::marker::{Marker, MarkerError, RequestContext};
use crate::server::router::AppState;
use crate::session::ClientSession;

/// Attach the client's session to the request.
///
/// A cookie is only honoured once its session holds data; otherwise a fresh
/// id is issued with a new cookie. The session itself is stored on the first
/// write.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let cookie_name = state.config.get().session.cookie_name;

    let known = cookie_value(req.headers(), &cookie_name)
        .filter(|id| state.sessions.contains(id));
    let (session, is_new) = match known {
        Some(id) => (state.sessions.session(id), false),
        None => (state.sessions.create(), true),
    };

    req.extensions_mut().insert(session.clone());
    let mut response = next.run(req).await;

    if is_new {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            cookie_name,
            session.id()
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Session cookie not representable as header"),
        }
    }

    response
}

/// Value of cookie `name` across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

impl FromRequestParts<AppState> for Marker {
    type Rejection = MarkerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<ClientSession>()
            .cloned()
            .ok_or(MarkerError::MissingRequestContext { field: "session" })?;
        let context = RequestContext::from_parts(parts, state.listen_port);
        Ok(Marker::new(context, session, state.config.get().marker))
    }
}
