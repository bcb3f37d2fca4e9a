//! Canonical, query-free page URLs.

use crate::marker::context::RequestContext;
use crate::marker::error::MarkerError;

/// Build the absolute URL of the current request, without its query.
///
/// The scheme comes from the protocol token (`HTTP/1.1` -> `http`) with an
/// `s` appended on secure connections. Default ports (80 plain, 443 secure)
/// are omitted.
pub fn current_url(ctx: &RequestContext) -> Result<String, MarkerError> {
    let uri = ctx
        .uri
        .as_deref()
        .ok_or(MarkerError::MissingRequestContext { field: "uri" })?;
    let host = ctx
        .server_name
        .as_deref()
        .filter(|h| !h.is_empty())
        .ok_or(MarkerError::MissingRequestContext { field: "server_name" })?;

    let protocol = ctx.protocol.to_lowercase();
    let transport = protocol.split('/').next().unwrap_or("http");
    let transport = if transport.is_empty() { "http" } else { transport };
    let scheme = if ctx.secure {
        format!("{transport}s")
    } else {
        transport.to_string()
    };

    let port = match ctx.port {
        Some(80) if !ctx.secure => String::new(),
        Some(443) if ctx.secure => String::new(),
        Some(port) => format!(":{port}"),
        None => String::new(),
    };

    let path = uri.split(|c: char| c == '?' || c == '#').next().unwrap_or("");
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    Ok(format!("{scheme}://{host}{port}{path}"))
}

/// Drop everything from the first `?` on.
pub fn strip_query(raw: &str) -> &str {
    match raw.split_once('?') {
        Some((base, _)) => base,
        None => raw,
    }
}
