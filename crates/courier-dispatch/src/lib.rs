//! Typed HTTP request dispatcher.
//!
//! Issues requests through one long-lived `reqwest` client, classifies each
//! response status against a configurable [`StatusPolicy`], and decodes the
//! body into one of two caller-chosen shapes: a success payload or a failure
//! payload. Locally detected failures (no connectivity, transport errors,
//! undecodable bodies) are synthesized into the failure shape through the
//! [`FailurePayload`] trait, and every outcome is delivered through a
//! [`Completion`] latch so a request resolves its continuations exactly once.

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod headers;
pub mod latch;
pub mod path;
pub mod query;
pub mod reachability;
pub mod status;

mod trace;

pub use client::{build_client, DispatchConfig, DispatchError};
pub use dispatcher::{Dispatcher, Outcome, RequestDescriptor};
pub use error::{ErrorCode, ErrorPayload, FailurePayload, CONNECTION_ERROR_MESSAGE};
pub use headers::mime;
pub use latch::{Completion, CompletionLatch};
pub use path::expand_path_params;
pub use query::{encode_query, Params};
pub use reachability::{AlwaysReachable, Reachability};
pub use status::{StatusClass, StatusPolicy};

pub use reqwest::Method;
