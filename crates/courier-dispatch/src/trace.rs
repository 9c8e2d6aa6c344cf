//! Request/response trace output. Diagnostic only, never affects control
//! flow; filtered at runtime through the `tracing` subscriber.

use std::collections::BTreeMap;

use reqwest::Method;

use crate::query::Params;

pub(crate) fn request(
    method: &Method,
    url: &str,
    headers: &BTreeMap<String, String>,
    body: Option<&Params>,
) {
    let body = body
        .and_then(|params| serde_json::to_string_pretty(params).ok())
        .unwrap_or_default();
    tracing::debug!(%method, url, ?headers, %body, "outgoing request");
}

pub(crate) fn response(status: u16, url: &str, body: &[u8]) {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value).unwrap_or_default();
            tracing::debug!(status, url, body = %pretty, "response");
        }
        Err(_) => {
            tracing::debug!(status, url, body = %String::from_utf8_lossy(body), "response");
        }
    }
}
