//! Transient notifications via the post-redirect-get pattern.
//!
//! Mutating handlers redirect back to their page with the message in the
//! query string; the page renders it once and the next navigation drops it.

use axum::response::Redirect;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ToastParams {
    pub toast: Option<String>,
}

pub fn redirect_with_toast(path: &str, message: &str) -> Redirect {
    match serde_urlencoded::to_string([("toast", message)]) {
        Ok(query) => Redirect::to(&format!("{}?{}", path, query)),
        Err(_) => Redirect::to(path),
    }
}
