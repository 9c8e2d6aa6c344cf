//! Status code classification.

use std::ops::RangeInclusive;

/// Classification of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// The response body should decode as the success shape.
    Success,
    /// The response body should decode as the failure shape.
    Error,
    /// The code is absent or outside the configured tables.
    Unknown,
}

/// Configurable mapping from status codes to [`StatusClass`].
///
/// Server conventions vary by API (some treat 3xx as success, some reserve
/// errors for 4xx+), so the boundaries are supplied per dispatcher rather
/// than hard-coded. When the ranges overlap, success wins.
#[derive(Debug, Clone)]
pub struct StatusPolicy {
    success: RangeInclusive<u16>,
    error: RangeInclusive<u16>,
}

impl StatusPolicy {
    /// Create a policy with explicit success and error ranges.
    pub fn new(success: RangeInclusive<u16>, error: RangeInclusive<u16>) -> Self {
        Self { success, error }
    }

    /// Classify a status code against the configured ranges.
    pub fn classify(&self, code: Option<u16>) -> StatusClass {
        match code {
            Some(code) if self.success.contains(&code) => StatusClass::Success,
            Some(code) if self.error.contains(&code) => StatusClass::Error,
            _ => StatusClass::Unknown,
        }
    }
}

impl Default for StatusPolicy {
    /// 2xx is success, 3xx through 5xx is an application error.
    fn default() -> Self {
        Self::new(200..=299, 300..=599)
    }
}
