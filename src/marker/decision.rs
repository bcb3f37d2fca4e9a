//! Redirect decision for a page visit.

use crate::marker::state::PageState;

/// Outcome of evaluating a visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Serve the page as requested.
    NoAction,
    /// Drop remembered state, then redirect to the bare base URL.
    ClearAndRedirect(String),
    /// Redirect to the base URL with the remembered query restored.
    RedirectWithQuery(String),
}

/// Decide what to do with a visit.
///
/// `load_stored` is only called when the visit carries no query at all, so
/// explicit client parameters never touch the store.
pub fn decide<F, E>(
    current_query: &PageState,
    base_url: &str,
    reset_key: &str,
    load_stored: F,
) -> Result<Action, E>
where
    F: FnOnce() -> Result<Option<PageState>, E>,
{
    if current_query.contains_key(reset_key) {
        return Ok(Action::ClearAndRedirect(base_url.to_string()));
    }

    if !current_query.is_empty() {
        return Ok(Action::NoAction);
    }

    // A stored state that encodes to nothing would bring the client straight
    // back here as another bare visit.
    let query = load_stored()?.map(|stored| stored.to_query()).unwrap_or_default();
    if query.is_empty() {
        return Ok(Action::NoAction);
    }
    Ok(Action::RedirectWithQuery(format!("{base_url}?{query}")))
}
