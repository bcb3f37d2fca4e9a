//! Demo listing pages that remember their filters.

use axum::response::{Html, IntoResponse, Response};

use crate::marker::{Marker, MarkerError, OverrideMode, PageState, ParamValue};

pub async fn index() -> Html<&'static str> {
    Html(
        "<!doctype html><title>pagemarker</title><ul>\
         <li><a href=\"/products\">Products</a></li>\
         <li><a href=\"/orders/list.html\">Orders</a></li>\
         </ul>",
    )
}

/// Remembers whatever query the client used.
pub async fn products(mut marker: Marker) -> Result<Response, MarkerError> {
    let flow = marker.remember(PageState::new(), OverrideMode::Replace)?;
    if let Some(redirect) = flow.into_redirect() {
        return Ok(redirect.into_response());
    }
    render("Products", &mut marker)
}

/// Fills in default filters and never remembers the `debug` flag.
pub async fn orders(mut marker: Marker) -> Result<Response, MarkerError> {
    let flow = marker.initialize(false)?;
    if let Some(redirect) = flow.into_redirect() {
        return Ok(redirect.into_response());
    }

    marker.except("debug");
    let defaults = PageState::new().with("status", "open").with("sort", "newest");
    let flow = marker.remember(defaults, OverrideMode::Append)?;
    if let Some(redirect) = flow.into_redirect() {
        return Ok(redirect.into_response());
    }
    render("Orders", &mut marker)
}

fn render(title: &str, marker: &mut Marker) -> Result<Response, MarkerError> {
    let reset_url = marker.reset_url()?;

    let mut rows = String::new();
    if let Some(data) = marker.data() {
        for (key, value) in data.iter() {
            rows.push_str(&format!(
                "<li><code>{}</code> = {}</li>",
                escape_html(key),
                value_html(value)
            ));
        }
    }

    let body = format!(
        "<!doctype html><title>{title}</title><h1>{title}</h1>\
         <p>Remembered as <code>{name}</code></p><ul>{rows}</ul>\
         <a href=\"{reset}\">Reset filters</a>",
        title = escape_html(title),
        name = escape_html(marker.name().unwrap_or_default()),
        rows = rows,
        reset = escape_html(&reset_url),
    );
    Ok(Html(body).into_response())
}

/// Lists render one item per element so `["a,b"]` and `["a", "b"]` differ.
fn value_html(value: &ParamValue) -> String {
    match value {
        ParamValue::Single(v) => escape_html(v),
        ParamValue::List(items) => {
            let items: String = items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_html(item)))
                .collect();
            format!("<ol>{items}</ol>")
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
