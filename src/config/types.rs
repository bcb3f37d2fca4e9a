use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub marker: MarkerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the server (host:port). Busy ports fall forward.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Page marker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Prefix of session keys holding remembered page state.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Query key that clears remembered state.
    #[serde(default = "default_reset_key")]
    pub reset_key: String,
}

/// Client session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_namespace() -> String {
    "PageMarker".to_string()
}

fn default_reset_key() -> String {
    "__pagemarker_reset".to_string()
}

fn default_cookie_name() -> String {
    "pagemarker_session".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            reset_key: default_reset_key(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
        }
    }
}
