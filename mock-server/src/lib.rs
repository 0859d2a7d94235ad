use std::time::Duration;

use axum::{
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(3);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub employee_name: String,
    pub employee_salary: i64,
    pub employee_age: i64,
    pub profile_image: String,
}

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub content_length: Option<String>,
    pub body: String,
}

pub fn employees() -> Vec<Employee> {
    [
        (1, "Tiger Nixon", 320800, 61),
        (2, "Garrett Winters", 170750, 63),
        (3, "Ashton Cox", 86000, 66),
        (4, "Cedric Kelly", 433060, 22),
    ]
    .into_iter()
    .map(|(id, name, salary, age)| Employee {
        id,
        employee_name: name.to_string(),
        employee_salary: salary,
        employee_age: age,
        profile_image: String::new(),
    })
    .collect()
}

pub fn app() -> Router {
    Router::new()
        .route("/api/v1/employees", get(list_employees))
        .route("/echo", any(echo))
        .route("/slow", get(slow))
        .route("/redirect", any(redirect))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_employees() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": employees(),
        "message": "Successfully! All records has been fetched.",
    }))
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    let value_of = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(Echo {
        method: method.to_string(),
        content_type: value_of(header::CONTENT_TYPE),
        authorization: value_of(header::AUTHORIZATION),
        content_length: value_of(header::CONTENT_LENGTH),
        body,
    })
}

async fn redirect() -> (StatusCode, [(header::HeaderName, &'static str); 1]) {
    (StatusCode::FOUND, [(header::LOCATION, "/echo")])
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_serializes_to_upstream_shape() {
        let json = serde_json::to_value(&employees()[0]).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["employee_name"], "Tiger Nixon");
        assert_eq!(json["employee_salary"], 320800);
        assert_eq!(json["employee_age"], 61);
        assert_eq!(json["profile_image"], "");
    }

    #[test]
    fn employee_ids_are_unique() {
        let mut ids: Vec<i64> = employees().iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), employees().len());
    }

    #[test]
    fn echo_serializes_missing_headers_as_null() {
        let echo = Echo {
            method: "POST".to_string(),
            content_type: None,
            authorization: Some("Bearer t".to_string()),
            content_length: Some("0".to_string()),
            body: String::new(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["content_type"], Value::Null);
        assert_eq!(json["authorization"], "Bearer t");
        assert_eq!(json["body"], "");
    }
}
