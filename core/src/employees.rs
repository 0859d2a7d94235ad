//! Employee lookups against the public dummy REST API.
//!
//! # Design
//! `EmployeeDirectory` is generic over `Invoke` so it can be driven by the
//! real `Invoker` or by a test double. Lookups by id fetch the full list and
//! filter it locally.

use serde_json::Value;
use tracing::debug;

use crate::error::ErrorResponse;
use crate::http::{InvocationRequest, InvocationResult};
use crate::invoker::Invoke;
use crate::json;

pub const DEFAULT_BASE_URL: &str = "https://dummy.restapiexample.com/api/v1";

pub const ID_REQUIRED: &str = "Employee id required";
pub const ID_NOT_FOUND: &str = "Employee id not found";
pub const UNEXPECTED_UPSTREAM: &str = "Unexpected upstream response";

#[derive(Debug, Clone)]
pub struct EmployeeDirectory<I> {
    invoker: I,
    base_url: String,
}

impl<I: Invoke> EmployeeDirectory<I> {
    pub fn new(invoker: I, base_url: &str) -> Self {
        Self {
            invoker,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn employees_url(&self) -> String {
        format!("{}/employees", self.base_url)
    }

    /// The upstream employee list, passed through as received.
    pub fn get_employees(&self) -> InvocationResult {
        self.invoker
            .invoke(&InvocationRequest::get(self.employees_url()))
    }

    /// The single employee record whose numeric `id` equals `id`, serialized
    /// as JSON.
    ///
    /// A blank or non-numeric `id` is rejected before any request is made.
    pub fn get_employee_by_id(&self, id: &str) -> Result<String, ErrorResponse> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ErrorResponse::new(ID_REQUIRED));
        }

        let not_found = || ErrorResponse::with_status(404, ID_NOT_FOUND);
        let wanted: i64 = id.parse().map_err(|_| not_found())?;

        let body = match self.get_employees() {
            InvocationResult::Response(response) => response.body,
            InvocationResult::Error(err) => return Err(err),
        };
        let Some(Value::Array(employees)) = json::get_property_value(&body, "$.data") else {
            return Err(ErrorResponse::new(UNEXPECTED_UPSTREAM));
        };

        let employee = employees
            .into_iter()
            .find(|employee| employee.get("id").and_then(numeric_id) == Some(wanted))
            .ok_or_else(not_found)?;
        debug!(id = wanted, "employee found");

        serde_json::to_string(&employee).map_err(|err| ErrorResponse::new(err.to_string()))
    }
}

/// Upstream ids are numbers, occasionally sent as numeric strings.
fn numeric_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
