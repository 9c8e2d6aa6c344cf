//! The request dispatcher: builds the request, issues it through the shared
//! transport, classifies the response, and decodes into the caller's success
//! or failure shape.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::client::{build_client, DispatchConfig, DispatchError};
use crate::error::{ErrorCode, ErrorPayload, FailurePayload, CONNECTION_ERROR_MESSAGE};
use crate::headers::{self, mime};
use crate::latch::Completion;
use crate::query::{encode_query, Params};
use crate::reachability::{AlwaysReachable, Reachability};
use crate::status::{StatusClass, StatusPolicy};
use crate::trace;

/// One request's inputs. Immutable once handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub base_url: String,
    pub endpoint: String,
    pub params: Option<Params>,
    pub content_type: String,
    pub headers: Option<BTreeMap<String, String>>,
}

impl RequestDescriptor {
    /// Describe a request with the default `application/json` content type.
    pub fn new(method: Method, base_url: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            base_url: base_url.into(),
            endpoint: endpoint.into(),
            params: None,
            content_type: mime::APPLICATION_JSON.to_string(),
            headers: None,
        }
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Add an extra header. Caller headers win over the content type header
    /// on collision.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// The final URL and the params destined for the body, if any.
    ///
    /// GET carries params in the query string; every other method carries
    /// them as a JSON body.
    fn effective_url_and_body(&self) -> (String, Option<&Params>) {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint);
        match &self.params {
            Some(params) if self.method == Method::GET => {
                (format!("{url}?{}", encode_query(params)), None)
            }
            Some(params) => (url, Some(params)),
            None => (url, None),
        }
    }
}

/// How one dispatched request resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<S, F> {
    /// Status classified as success and the body decoded as `S`.
    Success(S),
    /// A failure: decoded server error, or locally synthesized payload for
    /// connectivity, transport, and decode failures.
    Failure(F),
    /// Status fell outside the policy's tables; logged and not delivered.
    Dropped,
}

/// Issues typed requests through one shared HTTP client.
///
/// Construct once and clone freely; clones share the underlying connection
/// pool. The status policy and reachability probe are fixed at setup.
#[derive(Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    policy: StatusPolicy,
    reachability: Arc<dyn Reachability>,
}

impl Dispatcher {
    /// Create a dispatcher with default configuration.
    pub fn new() -> Result<Self, DispatchError> {
        Self::with_config(DispatchConfig::default())
    }

    /// Create a dispatcher with custom transport configuration.
    pub fn with_config(config: DispatchConfig) -> Result<Self, DispatchError> {
        Ok(Self {
            client: build_client(config)?,
            policy: StatusPolicy::default(),
            reachability: Arc::new(AlwaysReachable),
        })
    }

    /// Replace the status classification policy.
    pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the reachability probe.
    pub fn with_reachability(mut self, probe: Arc<dyn Reachability>) -> Self {
        self.reachability = probe;
        self
    }

    /// Get the inner reqwest client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Issue a request and deliver the outcome through continuations.
    ///
    /// Returns immediately after spawning the transport call; exactly one of
    /// `on_success` / `on_failure` fires later from the spawned task, except
    /// for the unclassified-status branch which resolves neither (it is
    /// logged at warn level instead). Delivery is latch-guarded, so even a
    /// duplicate delivery of the same response cannot invoke a continuation
    /// twice.
    pub fn request<S, F, OnSuccess, OnFailure>(
        &self,
        descriptor: RequestDescriptor,
        on_success: OnSuccess,
        on_failure: OnFailure,
    ) -> JoinHandle<()>
    where
        S: DeserializeOwned + Send + 'static,
        F: FailurePayload + Send + 'static,
        OnSuccess: FnOnce(S) + Send + 'static,
        OnFailure: FnOnce(F) + Send + 'static,
    {
        let completion = Completion::new(on_success, on_failure);
        let dispatcher = self.clone();
        tokio::spawn(async move {
            match dispatcher.perform::<S, F>(&descriptor).await {
                Outcome::Success(value) => {
                    completion.succeed(value);
                }
                Outcome::Failure(value) => {
                    completion.fail(value);
                }
                Outcome::Dropped => {}
            }
        })
    }

    /// Run the full request pipeline and return the outcome.
    ///
    /// [`request`](Self::request) is a spawning wrapper over this; callers
    /// that prefer an awaitable API can use it directly.
    pub async fn perform<S, F>(&self, descriptor: &RequestDescriptor) -> Outcome<S, F>
    where
        S: DeserializeOwned,
        F: FailurePayload,
    {
        if !self.reachability.is_reachable() {
            tracing::debug!(endpoint = %descriptor.endpoint, "network unreachable, short-circuiting");
            return Outcome::Failure(F::from_payload(ErrorPayload::local(
                ErrorCode::Connection,
                CONNECTION_ERROR_MESSAGE,
            )));
        }

        let (url, body) = descriptor.effective_url_and_body();
        let all_headers = headers::assemble(&descriptor.content_type, descriptor.headers.as_ref());
        trace::request(&descriptor.method, &url, &all_headers, body);

        let mut builder = self
            .client
            .request(descriptor.method.clone(), &url)
            .headers(headers::to_header_map(&all_headers));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => return transport_failure(err.to_string()),
        };

        let status = response.status().as_u16();
        let response_mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return transport_failure(err.to_string()),
        };
        trace::response(status, &url, &bytes);

        // Transport-level validation: any well-formed HTTP status passes on
        // to classification; only out-of-range codes and mime mismatches are
        // rejected outright.
        if !(200..600).contains(&status) {
            return transport_failure(format!("status code {status} outside accepted range"));
        }
        if let Some(response_mime) = &response_mime {
            if !headers::mime_matches(&descriptor.content_type, response_mime) {
                return transport_failure(format!(
                    "unexpected content type {response_mime}, wanted {}",
                    descriptor.content_type
                ));
            }
        }

        match self.policy.classify(Some(status)) {
            StatusClass::Success => match serde_json::from_slice::<S>(&bytes) {
                Ok(value) => Outcome::Success(value),
                Err(err) => Outcome::Failure(F::from_payload(ErrorPayload::local(
                    ErrorCode::InvalidResponse,
                    err.to_string(),
                ))),
            },
            StatusClass::Error => match serde_json::from_slice::<F>(&bytes) {
                Ok(mut value) => {
                    value.stamp_http_status(status);
                    Outcome::Failure(value)
                }
                Err(err) => Outcome::Failure(F::from_payload(ErrorPayload::local(
                    ErrorCode::InvalidResponse,
                    err.to_string(),
                ))),
            },
            StatusClass::Unknown => {
                tracing::warn!(status, url = %url, "unclassified status code, dropping response");
                Outcome::Dropped
            }
        }
    }
}

fn transport_failure<S, F: FailurePayload>(message: String) -> Outcome<S, F> {
    Outcome::Failure(F::from_payload(ErrorPayload::local(
        ErrorCode::Server,
        message,
    )))
}
