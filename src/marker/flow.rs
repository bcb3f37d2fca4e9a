use axum::response::{IntoResponse, Response};

/// What the request handler should do after a marker operation.
#[must_use = "a redirect must be returned to the client instead of rendering the page"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep handling the request.
    Continue,
    /// Stop and send this redirect.
    Redirect(Redirect),
}

impl Flow {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Flow::Redirect(_))
    }

    pub fn into_redirect(self) -> Option<Redirect> {
        match self {
            Flow::Continue => None,
            Flow::Redirect(redirect) => Some(redirect),
        }
    }
}

/// A 307 Temporary Redirect; the client repeats the same method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: String,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        axum::response::Redirect::temporary(&self.location).into_response()
    }
}
