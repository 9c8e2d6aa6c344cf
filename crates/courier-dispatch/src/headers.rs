//! Header assembly for outgoing requests.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Common content types.
pub mod mime {
    pub const APPLICATION_JSON: &str = "application/json";
    pub const TEXT_HTML: &str = "text/html";
    pub const APPLICATION_PDF: &str = "application/pdf";
    pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded; charset=utf-8";
    pub const IMAGE_PNG: &str = "image/png";
}

/// The content type header name.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Merge the fixed content type header with caller-supplied extras.
///
/// Caller values win on key collision; no other transformation is applied.
pub fn assemble(
    content_type: &str,
    extra: Option<&BTreeMap<String, String>>,
) -> BTreeMap<String, String> {
    let mut all = BTreeMap::new();
    all.insert(CONTENT_TYPE.to_string(), content_type.to_string());
    if let Some(extra) = extra {
        for (name, value) in extra {
            all.insert(name.clone(), value.clone());
        }
    }
    all
}

/// Convert assembled headers into a reqwest `HeaderMap`, skipping entries
/// that are not valid header names or values.
pub(crate) fn to_header_map(headers: &BTreeMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            map.insert(name, value);
        }
    }
    map
}

/// Compare two mime strings by their essence, ignoring parameters such as
/// `charset` and ASCII case.
pub(crate) fn mime_matches(expected: &str, actual: &str) -> bool {
    essence(expected).eq_ignore_ascii_case(essence(actual))
}

fn essence(mime: &str) -> &str {
    mime.split(';').next().unwrap_or(mime).trim()
}
