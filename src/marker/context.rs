//! Read-only view of the request a marker is working for.

use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::Version;

use crate::marker::state::PageState;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Request metadata needed to derive a page identity and base URL.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Path plus optional query, e.g. `/products?page=2`.
    pub uri: Option<String>,
    /// Whether the connection is served over TLS.
    pub secure: bool,
    pub server_name: Option<String>,
    pub port: Option<u16>,
    /// Protocol token such as `HTTP/1.1`.
    pub protocol: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            uri: None,
            secure: false,
            server_name: None,
            port: None,
            protocol: "HTTP/1.1".to_string(),
        }
    }
}

impl RequestContext {
    pub fn new(uri: impl Into<String>, server_name: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            server_name: Some(server_name.into()),
            ..Self::default()
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Build from axum request parts.
    ///
    /// The server name and port come from the `Host` header (or the URI
    /// authority). A host without a port means the scheme's default port, so
    /// `listen_port` is only used when the request names no host at all.
    /// `X-Forwarded-Proto: https` or an absolute `https` URI marks the
    /// request secure.
    pub fn from_parts(parts: &Parts, listen_port: Option<u16>) -> Self {
        let uri = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string());

        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.as_str().to_string()));

        let (server_name, port) = match host.as_deref().map(split_host_port) {
            Some((name, port)) => (Some(name.to_string()), port),
            None => (None, listen_port),
        };

        let forwarded_https = parts
            .headers
            .get(X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("https"));
        let secure = forwarded_https || parts.uri.scheme_str() == Some("https");

        Self {
            uri,
            secure,
            server_name,
            port,
            protocol: protocol_token(parts.version).to_string(),
        }
    }

    /// Path component of the request URI.
    pub fn path(&self) -> Option<&str> {
        self.uri
            .as_deref()
            .map(|uri| uri.split(|c: char| c == '?' || c == '#').next().unwrap_or(uri))
    }

    /// Query parameters of the request URI; empty when there is no query.
    pub fn query(&self) -> PageState {
        let query = self
            .uri
            .as_deref()
            .and_then(|uri| uri.split_once('?'))
            .map(|(_, rest)| rest.split('#').next().unwrap_or(rest))
            .unwrap_or("");
        PageState::from_query(query)
    }
}

fn split_host_port(host: &str) -> (&str, Option<u16>) {
    // [::1]:8080
    if let Some(rest) = host.strip_prefix('[') {
        if let Some((addr, tail)) = rest.split_once(']') {
            let port = tail.strip_prefix(':').and_then(|p| p.parse().ok());
            return (&host[..addr.len() + 2], port);
        }
    }
    match host.rsplit_once(':') {
        Some((name, port)) => match port.parse() {
            Ok(port) => (name, Some(port)),
            Err(_) => (host, None),
        },
        None => (host, None),
    }
}

fn protocol_token(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::page_url::current_url;
    use axum::http::Request;

    fn parts(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn path_and_query_split() {
        let ctx = RequestContext::new("/products/list.php?sort=asc&page=2#top", "example.com");
        assert_eq!(ctx.path(), Some("/products/list.php"));
        let query = ctx.query();
        assert_eq!(query.keys().collect::<Vec<_>>(), vec!["sort", "page"]);
    }

    #[test]
    fn missing_uri_has_no_path() {
        let ctx = RequestContext::default();
        assert_eq!(ctx.path(), None);
        assert!(ctx.query().is_empty());
    }

    #[test]
    fn from_parts_reads_host_header() {
        let req = Request::builder()
            .uri("/orders?status=open")
            .header(HOST, "shop.local:8080")
            .body(())
            .unwrap();
        let ctx = RequestContext::from_parts(&parts(req), Some(3000));
        assert_eq!(ctx.uri.as_deref(), Some("/orders?status=open"));
        assert_eq!(ctx.server_name.as_deref(), Some("shop.local"));
        assert_eq!(ctx.port, Some(8080));
        assert!(!ctx.secure);
        assert_eq!(ctx.protocol, "HTTP/1.1");
    }

    #[test]
    fn host_without_port_uses_scheme_default() {
        let req = Request::builder()
            .uri("/p")
            .header(HOST, "shop.example")
            .header(X_FORWARDED_PROTO, "HTTPS")
            .body(())
            .unwrap();
        let ctx = RequestContext::from_parts(&parts(req), Some(8080));
        assert_eq!(ctx.port, None);
        assert!(ctx.secure);
        assert_eq!(current_url(&ctx).unwrap(), "https://shop.example/p");
    }

    #[test]
    fn absolute_uri_authority_counts_as_host() {
        let req = Request::builder()
            .uri("https://shop.example/p")
            .body(())
            .unwrap();
        let ctx = RequestContext::from_parts(&parts(req), Some(8080));
        assert_eq!(ctx.server_name.as_deref(), Some("shop.example"));
        assert_eq!(ctx.port, None);
        assert!(ctx.secure);
    }

    #[test]
    fn no_host_falls_back_to_listen_port() {
        let req = Request::builder().uri("/p").body(()).unwrap();
        let ctx = RequestContext::from_parts(&parts(req), Some(8080));
        assert_eq!(ctx.server_name, None);
        assert_eq!(ctx.port, Some(8080));
    }

    #[test]
    fn split_host_port_handles_ipv6() {
        assert_eq!(split_host_port("[::1]:9000"), ("[::1]", Some(9000)));
        assert_eq!(split_host_port("[::1]"), ("[::1]", None));
        assert_eq!(split_host_port("example.com"), ("example.com", None));
    }
}
