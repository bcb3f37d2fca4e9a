//! Remember the query parameters a client used on a page and restore them
//! on the next bare visit.

pub mod config;
pub mod marker;
pub mod server;
pub mod session;

pub use marker::{Flow, Marker, MarkerError, OverrideMode, PageState, ParamValue, Redirect};
