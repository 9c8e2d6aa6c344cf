//! Mock HTTP server for dispatcher integration tests.
//!
//! Serves a small widget API plus a few deliberately misbehaving routes
//! (wrong content type, unparseable error body). Every handler increments a
//! shared hit counter so tests can assert how many requests actually reached
//! the server.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Widget {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateWidget {
    pub name: String,
}

/// Shared server state: a counter of requests that reached a handler.
#[derive(Clone, Default)]
pub struct ServerState {
    hits: Arc<AtomicUsize>,
}

impl ServerState {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/widgets", get(list_widgets).post(create_widget))
        .route("/widgets/{id}", get(get_widget))
        .route("/echo", get(echo_query))
        .route("/broken", get(broken))
        .route("/mismatched", get(mismatched))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: ServerState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn list_widgets(State(state): State<ServerState>) -> Json<Vec<Widget>> {
    state.record();
    Json(vec![Widget {
        id: 1,
        name: "gear".to_string(),
    }])
}

async fn create_widget(
    State(state): State<ServerState>,
    Json(input): Json<CreateWidget>,
) -> (StatusCode, Json<Widget>) {
    state.record();
    (
        StatusCode::CREATED,
        Json(Widget {
            id: 1,
            name: input.name,
        }),
    )
}

async fn get_widget(State(state): State<ServerState>, Path(id): Path<u64>) -> impl IntoResponse {
    state.record();
    if id == 1 {
        (StatusCode::OK, Json(json!({ "id": 1, "name": "gear" })))
    } else {
        // httpStatus is deliberately wrong; the dispatcher must stamp the
        // observed status over it.
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "code": 4,
                "title": "Warning",
                "message": "no such widget",
                "httpStatus": 999
            })),
        )
    }
}

async fn echo_query(
    State(state): State<ServerState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Json<BTreeMap<String, String>> {
    state.record();
    Json(params)
}

/// A 500 whose body claims to be JSON but is not.
async fn broken(State(state): State<ServerState>) -> impl IntoResponse {
    state.record();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        "not json",
    )
}

/// A 200 with an unexpected content type.
async fn mismatched(State(state): State<ServerState>) -> impl IntoResponse {
    state.record();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html")],
        "<html></html>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_serializes_to_json() {
        let widget = Widget {
            id: 1,
            name: "gear".to_string(),
        };
        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "gear");
    }

    #[test]
    fn widget_roundtrips_through_json() {
        let widget = Widget {
            id: 7,
            name: "sprocket".to_string(),
        };
        let json = serde_json::to_string(&widget).unwrap();
        let back: Widget = serde_json::from_str(&json).unwrap();
        assert_eq!(back, widget);
    }

    #[test]
    fn create_widget_rejects_missing_name() {
        let result: Result<CreateWidget, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn hit_counter_starts_at_zero() {
        let state = ServerState::default();
        assert_eq!(state.hits(), 0);
        state.record();
        assert_eq!(state.hits(), 1);
    }
}
