//! HTTP surface for the employee registry.
//!
//! - `POST /api/employees` – Validate a payload, assign a UUID, and store it. Returns `201` with
//!   the created record, `400` for invalid payloads, or `409` when the email is already taken.
//! - `GET /api/employees` – List every stored record.
//! - `DELETE /api/employees/{id}` – Remove a record. Returns `200` or `404`.
//! - `GET /doc` – OpenAPI document describing the routes above.
//! - `GET /ui` – Swagger UI bound to `/doc`.
//!
//! Every JSON response uses the same envelope: `{"success": true, "data": ...}` on success and
//! `{"success": false, "error": "..."}` on failure.

use crate::employees::{
    AddOutcome, Employee, EmployeeApi, EmployeePayload, ValidationError,
    validation::validate_employee_id,
};
use crate::openapi;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Build the HTTP router around a shared employee store.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: EmployeeApi + 'static,
{
    let employees = Router::new()
        .route(
            "/employees",
            get(list_employees::<S>).post(add_employee::<S>),
        )
        .route("/employees/:id", delete(remove_employee::<S>));

    Router::new()
        .nest("/api", employees)
        .route("/doc", get(openapi::document))
        .route("/ui", get(openapi::swagger_ui))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(service)
}

/// Success envelope carrying a payload.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct ApiData<T> {
    /// Always `true`.
    pub(crate) success: bool,
    /// Response payload.
    pub(crate) data: T,
}

impl<T> ApiData<T> {
    fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope without a payload.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct ApiAck {
    /// Always `true`.
    pub(crate) success: bool,
}

/// Failure envelope.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct ApiFailure {
    /// Always `false`.
    pub(crate) success: bool,
    /// Human-readable reason.
    pub(crate) error: String,
}

/// Create an employee from a validated payload.
async fn add_employee<S>(
    State(service): State<Arc<S>>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiData<Employee>>), ApiError>
where
    S: EmployeeApi,
{
    let Json(body) = body?;
    let employee = EmployeePayload::parse(&body)?.into_employee();
    let employee_id = employee.id.clone();

    match service.add(employee).await {
        AddOutcome::Created(employee) => {
            tracing::info!(
                employee_id = %employee.id,
                email = %employee.email,
                "Employee created"
            );
            Ok((StatusCode::CREATED, Json(ApiData::new(employee))))
        }
        AddOutcome::Conflict => {
            tracing::info!(
                employee_id = %employee_id,
                "Employee rejected: email already registered"
            );
            Err(ApiError::Conflict)
        }
    }
}

/// Return every stored employee.
async fn list_employees<S>(State(service): State<Arc<S>>) -> Json<ApiData<Vec<Employee>>>
where
    S: EmployeeApi,
{
    Json(ApiData::new(service.list().await))
}

/// Remove an employee by id.
async fn remove_employee<S>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<ApiAck>, ApiError>
where
    S: EmployeeApi,
{
    validate_employee_id(&id)?;
    if !service.remove(&id).await {
        return Err(ApiError::NotFound);
    }
    tracing::info!(employee_id = %id, "Employee removed");
    Ok(Json(ApiAck { success: true }))
}

/// Failures translated into HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body was not a JSON object.
    #[error("{0}")]
    MalformedBody(String),
    /// Payload parsed but broke a validation rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Another employee already uses the submitted email.
    #[error("employee already exists")]
    Conflict,
    /// No employee with the requested id exists.
    #[error("employee not found")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::BAD_REQUEST {
            tracing::debug!(error = %self, "Rejected invalid request");
        }
        let body = ApiFailure {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::employees::{AddOutcome, Employee, EmployeeApi, EmployeeStore};
    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex as StdMutex};
    use tokio::sync::Mutex;
    use tower::ServiceExt;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(payload) => {
                builder = builder.header("content-type", "application/json");
                Body::from(payload.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    fn john() -> Value {
        json!({ "firstName": "John", "lastName": "Doe", "email": "john.doe@example.com" })
    }

    #[tokio::test]
    async fn create_returns_trimmed_record_with_generated_id() {
        let app = create_router(Arc::new(EmployeeStore::new()));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/employees",
            Some(json!({
                "firstName": " Frank ",
                "lastName": "Doe ",
                "email": " frank.doe@example.com"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["firstName"], "Frank");
        assert_eq!(body["data"]["lastName"], "Doe");
        assert_eq!(body["data"]["email"], "frank.doe@example.com");
        let id = body["data"]["id"].as_str().expect("id string");
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn duplicate_email_yields_conflict() {
        let app = create_router(Arc::new(EmployeeStore::new()));
        let (status, _) = send(&app, Method::POST, "/api/employees", Some(john())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::POST, "/api/employees", Some(john())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "success": false, "error": "employee already exists" }));
    }

    #[tokio::test]
    async fn invalid_payloads_are_rejected_before_the_store() {
        let service = Arc::new(RecordingService::default());
        let app = create_router(service.clone());

        let cases = [
            json!({ "firstName": "John" }),
            json!({ "firstName": "John", "lastName": "Doe", "email": "invalid-email" }),
            json!({ "firstName": "Jo", "lastName": "D", "email": "john.doe@example.com" }),
            json!({
                "firstName": "Frank",
                "lastName": "Doe",
                "email": "frank.doe@example.com",
                "role": "admin"
            }),
            json!(["not", "an", "object"]),
        ];
        for payload in cases {
            let (status, body) =
                send(&app, Method::POST, "/api/employees", Some(payload.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
            assert_eq!(body["success"], false);
            assert!(body["error"].as_str().is_some_and(|error| !error.is_empty()));
        }

        assert!(service.added.lock().await.is_empty());
    }

    #[tokio::test]
    async fn validation_message_names_the_field() {
        let app = create_router(Arc::new(EmployeeStore::new()));
        let (_, body) = send(
            &app,
            Method::POST,
            "/api/employees",
            Some(json!({ "firstName": "Jo", "lastName": "Doe", "email": "jo@example.com" })),
        )
        .await;
        assert_eq!(body["error"], "firstName must be at least 3 characters long");
    }

    #[tokio::test]
    async fn field_errors_are_reported_before_unknown_keys() {
        let app = create_router(Arc::new(EmployeeStore::new()));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/employees",
            Some(json!({
                "firstName": "Jo",
                "lastName": "Doe",
                "email": "jo@example.com",
                "role": "admin"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "firstName must be at least 3 characters long");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/employees",
            Some(json!({
                "firstName": "Frank",
                "lastName": "Doe",
                "email": "frank.doe@example.com",
                "role": "admin"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unrecognized key(s) in object: 'role'");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<StdMutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .expect("log buffer lock")
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn requests_are_logged_at_default_level() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(
                fmt::layer()
                    .with_writer(move || writer.clone())
                    .with_ansi(false),
            );
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = create_router(Arc::new(EmployeeStore::new()));
        let (status, _) = send(&app, Method::GET, "/api/employees", None).await;
        assert_eq!(status, StatusCode::OK);

        let output = String::from_utf8(logs.0.lock().expect("log buffer lock").clone())
            .expect("utf8 logs");
        assert!(
            output.contains("finished processing request"),
            "missing request log line in {output:?}"
        );
        assert!(output.contains("/api/employees"), "missing uri in {output:?}");
        assert!(output.contains("status=200"), "missing status in {output:?}");
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let app = create_router(Arc::new(EmployeeStore::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/employees")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_wraps_records_in_envelope() {
        let app = create_router(Arc::new(EmployeeStore::new()));
        send(&app, Method::POST, "/api/employees", Some(john())).await;

        let (status, body) = send(&app, Method::GET, "/api/employees", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn delete_maps_outcomes_to_status_codes() {
        let app = create_router(Arc::new(EmployeeStore::new()));
        let (_, created) = send(&app, Method::POST, "/api/employees", Some(john())).await;
        let id = created["data"]["id"].as_str().expect("id").to_string();
        let uri = format!("/api/employees/{id}");

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "success": false, "error": "employee not found" }));
    }

    #[tokio::test]
    async fn delete_rejects_short_ids() {
        let service = Arc::new(RecordingService::default());
        let app = create_router(service.clone());

        let (status, body) = send(&app, Method::DELETE, "/api/employees/ab", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "id must be at least 3 characters long");
        assert!(service.removed.lock().await.is_empty());
    }

    #[tokio::test]
    async fn delete_passes_path_id_to_service() {
        let service = Arc::new(RecordingService::default());
        let app = create_router(service.clone());

        let (status, _) =
            send(&app, Method::DELETE, "/api/employees/non-existent-id", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(*service.removed.lock().await, vec!["non-existent-id".to_string()]);
    }

    #[derive(Default)]
    struct RecordingService {
        added: Mutex<Vec<Employee>>,
        removed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EmployeeApi for RecordingService {
        async fn add(&self, employee: Employee) -> AddOutcome {
            self.added.lock().await.push(employee.clone());
            AddOutcome::Created(employee)
        }

        async fn remove(&self, id: &str) -> bool {
            self.removed.lock().await.push(id.to_string());
            false
        }

        async fn list(&self) -> Vec<Employee> {
            self.added.lock().await.clone()
        }
    }
}
