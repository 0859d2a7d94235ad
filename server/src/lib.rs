//! REST controller in front of the invoker.
//!
//! # Design
//! Handlers are thin: they validate query parameters, hand the blocking
//! upstream call to `spawn_blocking`, and copy the status code and body of
//! whatever comes back. Errors are already response-shaped by the time they
//! reach this layer, so every handler answers with JSON.

pub mod config;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use api_invoker::{EmployeeDirectory, ErrorResponse, Invoke, Invoker, Response};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

pub use config::{ConfigError, ServerConfig};

const GREETING_TEMPLATE: &str = "Hello, {}!";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Greeting {
    pub id: u64,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct HelloParams {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmployeeParams {
    pub id: Option<String>,
}

pub struct AppState<I = Invoker> {
    counter: AtomicU64,
    directory: EmployeeDirectory<I>,
}

impl<I> AppState<I> {
    pub fn new(directory: EmployeeDirectory<I>) -> Self {
        Self {
            counter: AtomicU64::new(0),
            directory,
        }
    }
}

pub fn app<I>(state: Arc<AppState<I>>) -> Router
where
    I: Invoke + Send + Sync + 'static,
{
    Router::new()
        .route("/hello", get(hello::<I>))
        .route("/employees", get(employees::<I>))
        .route("/employee", get(employee::<I>))
        .with_state(state)
}

/// Serves the controller for `config` on `listener`.
pub async fn run(listener: TcpListener, config: &ServerConfig) -> Result<(), std::io::Error> {
    let invoker = Invoker::with_trust_policy(config.trust_policy);
    let directory = EmployeeDirectory::new(invoker, &config.upstream_url);
    let state = Arc::new(AppState::new(directory));
    info!(
        addr = %listener.local_addr()?,
        upstream = %config.upstream_url,
        trust = ?config.trust_policy,
        "serving"
    );
    axum::serve(listener, app(state)).await
}

async fn hello<I>(
    State(state): State<Arc<AppState<I>>>,
    Query(params): Query<HelloParams>,
) -> Json<Greeting> {
    let name = params
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "World".to_string());
    Json(Greeting {
        id: state.counter.fetch_add(1, Ordering::Relaxed) + 1,
        content: GREETING_TEMPLATE.replace("{}", &name),
    })
}

async fn employees<I>(State(state): State<Arc<AppState<I>>>) -> impl IntoResponse
where
    I: Invoke + Send + Sync + 'static,
{
    let result = blocking(move || {
        let result = state.directory.get_employees();
        (result.status_code(), result.into_body())
    })
    .await;
    match result {
        Ok((status, body)) => json_response(status, body),
        Err(err) => error_response(&err),
    }
}

async fn employee<I>(
    State(state): State<Arc<AppState<I>>>,
    Query(params): Query<EmployeeParams>,
) -> impl IntoResponse
where
    I: Invoke + Send + Sync + 'static,
{
    let id = params.id.unwrap_or_default();
    let result = blocking(move || state.directory.get_employee_by_id(&id)).await;
    match result.and_then(|lookup| lookup) {
        Ok(record) => json_response(200, record),
        Err(err) => error_response(&err),
    }
}

/// Runs a blocking upstream call off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, ErrorResponse>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|err| {
        error!(error = %err, "upstream task failed");
        ErrorResponse::default()
    })
}

fn json_response(status: u16, body: String) -> axum::response::Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn error_response(err: &ErrorResponse) -> axum::response::Response {
    json_response(err.status_code(), err.body().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_serializes_id_and_content() {
        let greeting = Greeting {
            id: 7,
            content: GREETING_TEMPLATE.replace("{}", "Ann"),
        };
        let json = serde_json::to_value(&greeting).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["content"], "Hello, Ann!");
    }

    #[test]
    fn out_of_range_status_maps_to_bad_gateway() {
        let response = json_response(42, "{}".to_string());
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let response = json_response(404, "{}".to_string());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }
}
