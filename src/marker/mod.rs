//! Page markers: remember a page's query parameters in the client session
//! and send bare visits back to the remembered state.
//!
//! A [`Marker`] is built per request. Call [`Marker::remember`] on every page
//! load; when it returns [`Flow::Redirect`] the handler must return that
//! redirect instead of rendering the page.

pub mod context;
pub mod decision;
mod error;
mod flow;
pub mod name;
pub mod page_url;
pub mod state;

pub use context::RequestContext;
pub use decision::Action;
pub use error::MarkerError;
pub use flow::{Flow, Redirect};
pub use state::{PageState, ParamValue};

use crate::config::MarkerConfig;
use crate::session::{SessionBackend, StateStore};

/// How [`Marker::remember`] combines its argument with the working data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrideMode {
    /// The given parameters become the remembered data.
    #[default]
    Replace,
    /// The given parameters are merged in; existing keys win.
    Append,
}

/// Identity and working state of one page for one request.
pub struct Marker {
    config: MarkerConfig,
    context: RequestContext,
    store: StateStore,
    name: Option<String>,
    url: Option<String>,
    data: Option<PageState>,
    initialized: bool,
}

impl Marker {
    pub fn new(
        context: RequestContext,
        session: impl SessionBackend + 'static,
        config: MarkerConfig,
    ) -> Self {
        let store = StateStore::new(config.namespace.clone(), session);
        Self {
            config,
            context,
            store,
            name: None,
            url: None,
            data: None,
            initialized: false,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Working data; `None` until set explicitly or captured by
    /// [`Marker::initialize`].
    pub fn data(&self) -> Option<&PageState> {
        self.data.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Set the page name. The raw value is normalized first.
    pub fn set_name(&mut self, raw: &str) -> Result<&mut Self, MarkerError> {
        let name = name::normalize(raw);
        if name.is_empty() {
            return Err(MarkerError::InvalidIdentity { raw: raw.to_string() });
        }
        self.name = Some(name);
        Ok(self)
    }

    /// Derive the page name from the request path.
    pub fn set_name_from_url(&mut self) -> Result<&mut Self, MarkerError> {
        let path = self
            .context
            .path()
            .ok_or(MarkerError::MissingRequestContext { field: "uri" })?;
        let name = name::from_path(path);
        if name.is_empty() {
            return Err(MarkerError::InvalidIdentity { raw: path.to_string() });
        }
        tracing::debug!(path = %path, name = %name, "Derived marker name");
        self.name = Some(name);
        Ok(self)
    }

    /// Set the redirect base URL. Any query in `raw` is dropped.
    pub fn set_url(&mut self, raw: &str) -> &mut Self {
        self.url = Some(page_url::strip_query(raw).to_string());
        self
    }

    /// Derive the redirect base URL from the request.
    pub fn auto_set_url(&mut self) -> Result<&mut Self, MarkerError> {
        let current = page_url::current_url(&self.context)?;
        Ok(self.set_url(&current))
    }

    /// Replace the working data.
    pub fn set_data(&mut self, state: PageState) -> &mut Self {
        self.data = Some(state);
        self
    }

    /// Resolve identity, capture the request query, and check whether the
    /// visit must be redirected.
    ///
    /// Name and URL are derived only when unset. The redirect check runs on
    /// every call unless `bypass_redirect` is set.
    pub fn initialize(&mut self, bypass_redirect: bool) -> Result<Flow, MarkerError> {
        self.ensure_identity()?;

        if self.data.is_none() {
            self.data = Some(self.context.query());
        }

        if !bypass_redirect {
            let flow = self.check_redirect()?;
            if flow.is_redirect() {
                return Ok(flow);
            }
        }

        self.initialized = true;
        Ok(Flow::Continue)
    }

    /// Set a single key in the working data.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        let data = self.data.take().unwrap_or_default();
        self.data = Some(data.with(key, value));
        self
    }

    /// Merge `state` into the working data. Keys already present keep their
    /// value.
    pub fn add_all(&mut self, state: &PageState) -> &mut Self {
        let data = self.data.take().unwrap_or_default();
        self.data = Some(data.merged(state));
        self
    }

    /// Remove a key from the working data.
    pub fn except(&mut self, key: &str) -> &mut Self {
        self.except_all([key])
    }

    pub fn except_all<I, K>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        if let Some(data) = self.data.take() {
            self.data = Some(data.without(keys));
        }
        self
    }

    /// Persist the working data for this page.
    ///
    /// Initializes first when needed; if that decides on a redirect nothing
    /// is written and the redirect is returned. Non-empty `vars` replace or
    /// extend the working data according to `mode`.
    pub fn remember(&mut self, vars: PageState, mode: OverrideMode) -> Result<Flow, MarkerError> {
        if !self.initialized {
            let flow = self.initialize(false)?;
            if flow.is_redirect() {
                return Ok(flow);
            }
        }

        if !vars.is_empty() {
            match mode {
                OverrideMode::Replace => {
                    self.set_data(vars);
                }
                OverrideMode::Append => {
                    self.add_all(&vars);
                }
            }
        }

        let name = self.ensure_name()?.to_string();
        let data = self.data.clone().unwrap_or_default();
        self.store.set(&name, &data)?;
        tracing::debug!(name = %name, keys = data.len(), "Remembered page state");
        Ok(Flow::Continue)
    }

    /// Drop the remembered state for this page.
    pub fn forget(&mut self) -> Result<(), MarkerError> {
        let name = self.ensure_name()?.to_string();
        self.store.delete(&name)?;
        tracing::debug!(name = %name, "Forgot page state");
        Ok(())
    }

    /// Link that clears the remembered state and returns to the bare page.
    pub fn reset_url(&mut self) -> Result<String, MarkerError> {
        let base = self.ensure_url()?.to_string();
        Ok(format!("{}?{}=1", base, self.config.reset_key))
    }

    fn ensure_identity(&mut self) -> Result<(), MarkerError> {
        self.ensure_name()?;
        self.ensure_url()?;
        Ok(())
    }

    fn ensure_name(&mut self) -> Result<&str, MarkerError> {
        if self.name.is_none() {
            self.set_name_from_url()?;
        }
        self.name
            .as_deref()
            .ok_or(MarkerError::MissingRequestContext { field: "uri" })
    }

    fn ensure_url(&mut self) -> Result<&str, MarkerError> {
        if self.url.is_none() {
            self.auto_set_url()?;
        }
        self.url
            .as_deref()
            .ok_or(MarkerError::MissingRequestContext { field: "uri" })
    }

    fn check_redirect(&mut self) -> Result<Flow, MarkerError> {
        let name = self.ensure_name()?.to_string();
        let base = self.ensure_url()?.to_string();
        let query = self.context.query();

        let store = &self.store;
        let action = decision::decide(&query, &base, &self.config.reset_key, || store.get(&name))?;

        match action {
            Action::NoAction => Ok(Flow::Continue),
            Action::ClearAndRedirect(target) => {
                self.store.delete(&name)?;
                tracing::info!(name = %name, location = %target, "Page state reset");
                Ok(Flow::Redirect(Redirect::to(target)))
            }
            Action::RedirectWithQuery(target) => {
                tracing::info!(name = %name, location = %target, "Restoring remembered page state");
                Ok(Flow::Redirect(Redirect::to(target)))
            }
        }
    }
}
