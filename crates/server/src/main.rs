// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use turnero_api::{
    ApiError, CreateProcedureTypeRequest, ProcedureTypeInfo, QueueEntryInfo,
    QueuePositionResponse, RegisterStudentRequest, RequestTicketRequest,
    SetProcedureStatusRequest, StudentInfo, TicketInfo, TransitionTicketRequest,
    UpdateTicketStatusRequest, WaitEstimateResponse, call_next, cancel_ticket,
    create_procedure_type, current_ticket, finish_ticket, get_ticket_status, list_procedure_types,
    list_queue, list_student_tickets, mark_absent, queue_position, register_student,
    request_ticket, set_procedure_status, update_ticket_status, wait_estimate,
};
use turnero_persistence::Persistence;

/// Turnero Server - HTTP server for the student services queue
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for tickets, students, and procedures.
    persistence: Arc<Mutex<Persistence>>,
}

/// Query parameters for the staff queue view.
#[derive(Debug, Deserialize)]
struct QueueQuery {
    /// The calendar date (`YYYY-MM-DD`). Defaults to today (UTC).
    date: Option<String>,
}

/// Query parameters for a student's ticket history.
#[derive(Debug, Deserialize)]
struct HistoryQuery {
    /// Optional lifecycle state filter (e.g. `en_cola`, `atendido`).
    state: Option<String>,
}

/// The uniform response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiEnvelope<T> {
    /// Success indicator.
    success: bool,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// The response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    fn ok(message: String, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message),
            data: Some(data),
        })
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Success indicator, always `false`.
    success: bool,
    /// Error message.
    message: String,
    /// Optional payload, e.g. the conflicting ticket on admission.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    /// Optional payload carried alongside the error.
    data: Option<serde_json::Value>,
}

impl HttpError {
    const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            data: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            success: false,
            message: self.message,
            data: self.data,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::ResourceNotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ApiError::ActiveTicketConflict { ticket } => Self {
                status: StatusCode::CONFLICT,
                message: String::from("Ya tienes un turno en curso"),
                data: serde_json::to_value(&*ticket).ok(),
            },
            ApiError::RuleViolation { .. } => Self::new(StatusCode::CONFLICT, err.to_string()),
            ApiError::InvalidTransition { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::Transient { .. } => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

/// Handler for POST `/students`.
async fn handle_register_student(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterStudentRequest>,
) -> Result<Json<ApiEnvelope<StudentInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let student: StudentInfo = register_student(&mut persistence, &req)?;
    drop(persistence);

    Ok(ApiEnvelope::ok(
        format!("Registered student '{}'", student.name),
        student,
    ))
}

/// Handler for POST `/procedure_types`.
async fn handle_create_procedure_type(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateProcedureTypeRequest>,
) -> Result<Json<ApiEnvelope<ProcedureTypeInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let procedure: ProcedureTypeInfo = create_procedure_type(&mut persistence, &req)?;
    drop(persistence);

    Ok(ApiEnvelope::ok(
        format!("Created procedure type '{}'", procedure.name),
        procedure,
    ))
}

/// Handler for GET `/procedure_types`.
async fn handle_list_procedure_types(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ApiEnvelope<Vec<ProcedureTypeInfo>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let procedures: Vec<ProcedureTypeInfo> = list_procedure_types(&mut persistence)?;
    drop(persistence);

    Ok(ApiEnvelope::ok(
        format!("{} procedure types", procedures.len()),
        procedures,
    ))
}

/// Handler for POST `/procedure_types/{id}/status`.
async fn handle_set_procedure_status(
    AxumState(app_state): AxumState<AppState>,
    Path(procedure_type_id): Path<i64>,
    Json(req): Json<SetProcedureStatusRequest>,
) -> Result<Json<ApiEnvelope<ProcedureTypeInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let procedure: ProcedureTypeInfo =
        set_procedure_status(&mut persistence, procedure_type_id, &req.status)?;
    drop(persistence);

    Ok(ApiEnvelope::ok(
        format!("Procedure type '{}' is now {}", procedure.name, procedure.status),
        procedure,
    ))
}

/// Handler for POST `/tickets`.
///
/// Admits a student into the queue. A student already holding an
/// active ticket receives `409 Conflict` with the blocking ticket in
/// the error payload.
async fn handle_request_ticket(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RequestTicketRequest>,
) -> Result<Json<ApiEnvelope<TicketInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let ticket: TicketInfo = request_ticket(&mut persistence, &req)?;
    drop(persistence);

    Ok(ApiEnvelope::ok(format!("Turno {} asignado", ticket.code), ticket))
}

/// Handler for POST `/queue/next`.
///
/// Calls the next waiting ticket; an empty queue is `404 Not Found`.
async fn handle_call_next(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ApiEnvelope<TicketInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let called: Option<TicketInfo> = call_next(&mut persistence)?;
    drop(persistence);

    called.map_or_else(
        || {
            Err(HttpError::new(
                StatusCode::NOT_FOUND,
                String::from("No hay turnos en espera"),
            ))
        },
        |ticket| Ok(ApiEnvelope::ok(format!("Turno {}", ticket.code), ticket)),
    )
}

/// Parses the optional notes body of a transition endpoint.
///
/// The body may be absent entirely; present-but-malformed JSON is a
/// client error.
fn parse_transition_body(body: &axum::body::Bytes) -> Result<Option<String>, HttpError> {
    if body.is_empty() {
        return Ok(None);
    }
    let request: TransitionTicketRequest = serde_json::from_slice(body).map_err(|e| {
        HttpError::new(StatusCode::BAD_REQUEST, format!("Invalid request body: {e}"))
    })?;
    Ok(request.notes)
}

fn transition_response(
    result: Result<TicketInfo, ApiError>,
    verb: &str,
) -> Result<Json<ApiEnvelope<TicketInfo>>, HttpError> {
    let ticket = result?;
    Ok(ApiEnvelope::ok(format!("Turno {} {verb}", ticket.code), ticket))
}

/// Handler for POST `/tickets/{id}/finish`.
async fn handle_finish_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    body: axum::body::Bytes,
) -> Result<Json<ApiEnvelope<TicketInfo>>, HttpError> {
    let notes = parse_transition_body(&body)?;
    let mut persistence = app_state.persistence.lock().await;
    let result = finish_ticket(&mut persistence, ticket_id, notes.as_deref());
    drop(persistence);
    transition_response(result, "atendido")
}

/// Handler for POST `/tickets/{id}/absent`.
async fn handle_mark_absent(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    body: axum::body::Bytes,
) -> Result<Json<ApiEnvelope<TicketInfo>>, HttpError> {
    let notes = parse_transition_body(&body)?;
    let mut persistence = app_state.persistence.lock().await;
    let result = mark_absent(&mut persistence, ticket_id, notes.as_deref());
    drop(persistence);
    transition_response(result, "marcado ausente")
}

/// Handler for POST `/tickets/{id}/cancel`.
async fn handle_cancel_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    body: axum::body::Bytes,
) -> Result<Json<ApiEnvelope<TicketInfo>>, HttpError> {
    let notes = parse_transition_body(&body)?;
    let mut persistence = app_state.persistence.lock().await;
    let result = cancel_ticket(&mut persistence, ticket_id, notes.as_deref());
    drop(persistence);
    transition_response(result, "cancelado")
}

/// Handler for POST `/tickets/{id}/status`.
///
/// The generic transition for staff tooling; the lifecycle table still
/// decides legality.
async fn handle_update_ticket_status(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<UpdateTicketStatusRequest>,
) -> Result<Json<ApiEnvelope<TicketInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let result = update_ticket_status(&mut persistence, ticket_id, &req);
    drop(persistence);
    transition_response(result, "actualizado")
}

/// Handler for GET `/tickets/{id}/status`.
async fn handle_ticket_status(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
) -> Result<Json<ApiEnvelope<TicketInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let ticket: TicketInfo = get_ticket_status(&mut persistence, ticket_id)?;
    drop(persistence);

    Ok(ApiEnvelope::ok(format!("Turno {}", ticket.code), ticket))
}

/// Handler for GET `/tickets/{id}/position`.
async fn handle_queue_position(
    AxumState(app_state): AxumState<AppState>,
    Path(ticket_id): Path<i64>,
) -> Result<Json<ApiEnvelope<QueuePositionResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let position: QueuePositionResponse = queue_position(&mut persistence, ticket_id)?;
    drop(persistence);

    let message = position.position.map_or_else(
        || format!("El turno esta {}", position.state),
        |p| format!("Posicion {p} en la cola"),
    );
    Ok(ApiEnvelope::ok(message, position))
}

/// Handler for GET `/procedure_types/{id}/wait_estimate`.
async fn handle_wait_estimate(
    AxumState(app_state): AxumState<AppState>,
    Path(procedure_type_id): Path<i64>,
) -> Result<Json<ApiEnvelope<WaitEstimateResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let estimate: WaitEstimateResponse = wait_estimate(&mut persistence, procedure_type_id)?;
    drop(persistence);

    Ok(ApiEnvelope::ok(
        format!("Espera estimada: {} minutos", estimate.estimated_wait_minutes),
        estimate,
    ))
}

/// Handler for GET `/queue`.
async fn handle_list_queue(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<QueueQuery>,
) -> Result<Json<ApiEnvelope<Vec<QueueEntryInfo>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let entries: Vec<QueueEntryInfo> = list_queue(&mut persistence, query.date.as_deref())?;
    drop(persistence);

    Ok(ApiEnvelope::ok(format!("{} turnos activos", entries.len()), entries))
}

/// Handler for GET `/students/{id}/current_ticket`.
async fn handle_current_ticket(
    AxumState(app_state): AxumState<AppState>,
    Path(student_id): Path<i64>,
) -> Result<Json<ApiEnvelope<Option<TicketInfo>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let ticket: Option<TicketInfo> = current_ticket(&mut persistence, student_id)?;
    drop(persistence);

    let message = ticket.as_ref().map_or_else(
        || String::from("Sin turno activo"),
        |t| format!("Turno activo {}", t.code),
    );
    Ok(Json(ApiEnvelope {
        success: true,
        message: Some(message),
        data: Some(ticket),
    }))
}

/// Handler for GET `/students/{id}/tickets`.
async fn handle_student_tickets(
    AxumState(app_state): AxumState<AppState>,
    Path(student_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiEnvelope<Vec<TicketInfo>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let tickets: Vec<TicketInfo> =
        list_student_tickets(&mut persistence, student_id, query.state.as_deref())?;
    drop(persistence);

    Ok(ApiEnvelope::ok(format!("{} turnos", tickets.len()), tickets))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/students", post(handle_register_student))
        .route("/students/{student_id}/current_ticket", get(handle_current_ticket))
        .route("/students/{student_id}/tickets", get(handle_student_tickets))
        .route("/procedure_types", post(handle_create_procedure_type))
        .route("/procedure_types", get(handle_list_procedure_types))
        .route(
            "/procedure_types/{procedure_type_id}/status",
            post(handle_set_procedure_status),
        )
        .route(
            "/procedure_types/{procedure_type_id}/wait_estimate",
            get(handle_wait_estimate),
        )
        .route("/tickets", post(handle_request_ticket))
        .route("/tickets/{ticket_id}/finish", post(handle_finish_ticket))
        .route("/tickets/{ticket_id}/absent", post(handle_mark_absent))
        .route("/tickets/{ticket_id}/cancel", post(handle_cancel_ticket))
        .route(
            "/tickets/{ticket_id}/status",
            get(handle_ticket_status).post(handle_update_ticket_status),
        )
        .route("/tickets/{ticket_id}/position", get(handle_queue_position))
        .route("/queue", get(handle_list_queue))
        .route("/queue/next", post(handle_call_next))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Turnero Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn post_empty(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_uri(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Registers a student and returns its ID.
    async fn register(app: &Router, name: &str, email: &str) -> i64 {
        let response = post_json(
            app,
            "/students",
            serde_json::json!({ "name": name, "email": email }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        body_json(response).await["data"]["student_id"]
            .as_i64()
            .unwrap()
    }

    /// Creates a procedure type and returns its ID.
    async fn create_procedure(app: &Router, name: &str, minutes: i64) -> i64 {
        let response = post_json(
            app,
            "/procedure_types",
            serde_json::json!({ "name": name, "estimated_duration_minutes": minutes }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        body_json(response).await["data"]["procedure_type_id"]
            .as_i64()
            .unwrap()
    }

    async fn admit(app: &Router, student_id: i64, procedure_type_id: i64) -> serde_json::Value {
        let response = post_json(
            app,
            "/tickets",
            serde_json::json!({
                "student_id": student_id,
                "procedure_type_id": procedure_type_id,
            }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        body_json(response).await["data"].clone()
    }

    #[tokio::test]
    async fn test_full_queue_flow() {
        let app: Router = build_router(create_test_app_state());

        let ana = register(&app, "Ana Torres", "ana@uni.edu").await;
        let luis = register(&app, "Luis Vega", "luis@uni.edu").await;
        let kardex = create_procedure(&app, "Kardex", 5).await;

        let first = admit(&app, ana, kardex).await;
        let second = admit(&app, luis, kardex).await;
        assert_eq!(first["state"], "en_cola");
        assert!(first["code"].as_str().unwrap().starts_with('T'));

        // Two active tickets in today's queue.
        let response = get_uri(&app, "/queue").await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["student_name"], "Ana Torres");
        assert_eq!(body["data"][0]["procedure_name"], "Kardex");

        // Call-next hands out Ana's ticket first.
        let response = post_empty(&app, "/queue/next").await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["ticket_id"], first["ticket_id"]);
        assert_eq!(body["data"]["state"], "atendiendo");

        // Finish Ana's ticket with notes.
        let ticket_id = first["ticket_id"].as_i64().unwrap();
        let response = post_json(
            &app,
            &format!("/tickets/{ticket_id}/finish"),
            serde_json::json!({ "notes": "entregado" }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["state"], "atendido");
        assert_eq!(body["data"]["notes"], "entregado");

        // Luis is now at the head of the line.
        let luis_ticket = second["ticket_id"].as_i64().unwrap();
        let response = get_uri(&app, &format!("/tickets/{luis_ticket}/position")).await;
        let body = body_json(response).await;
        assert_eq!(body["data"]["position"], 1);
    }

    #[tokio::test]
    async fn test_duplicate_admission_returns_conflict_with_ticket() {
        let app: Router = build_router(create_test_app_state());
        let ana = register(&app, "Ana", "ana@uni.edu").await;
        let kardex = create_procedure(&app, "Kardex", 5).await;

        let first = admit(&app, ana, kardex).await;

        let response = post_json(
            &app,
            "/tickets",
            serde_json::json!({ "student_id": ana, "procedure_type_id": kardex }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Ya tienes un turno en curso");
        assert_eq!(body["data"]["code"], first["code"]);
    }

    #[tokio::test]
    async fn test_call_next_on_empty_queue_is_not_found() {
        let app: Router = build_router(create_test_app_state());
        let response = post_empty(&app, "/queue/next").await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "No hay turnos en espera");
    }

    #[tokio::test]
    async fn test_malformed_queue_date_is_bad_request() {
        let app: Router = build_router(create_test_app_state());
        let response = get_uri(&app, "/queue?date=14-06-2025x").await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_ticket_is_not_found() {
        let app: Router = build_router(create_test_app_state());
        let response = get_uri(&app, "/tickets/777/status").await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_double_finish_is_unprocessable() {
        let app: Router = build_router(create_test_app_state());
        let ana = register(&app, "Ana", "ana@uni.edu").await;
        let kardex = create_procedure(&app, "Kardex", 5).await;
        let ticket = admit(&app, ana, kardex).await;
        let ticket_id = ticket["ticket_id"].as_i64().unwrap();

        let response = post_empty(&app, &format!("/tickets/{ticket_id}/finish")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = post_empty(&app, &format!("/tickets/{ticket_id}/finish")).await;
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_generic_status_update() {
        let app: Router = build_router(create_test_app_state());
        let ana = register(&app, "Ana", "ana@uni.edu").await;
        let kardex = create_procedure(&app, "Kardex", 5).await;
        let ticket = admit(&app, ana, kardex).await;
        let ticket_id = ticket["ticket_id"].as_i64().unwrap();

        let response = post_json(
            &app,
            &format!("/tickets/{ticket_id}/status"),
            serde_json::json!({ "state": "atendiendo" }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["state"], "atendiendo");

        let response = post_json(
            &app,
            &format!("/tickets/{ticket_id}/status"),
            serde_json::json!({ "state": "en_cola" }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

        let response = post_json(
            &app,
            &format!("/tickets/{ticket_id}/status"),
            serde_json::json!({ "state": "bogus" }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_suspended_procedure_rejects_admission() {
        let app: Router = build_router(create_test_app_state());
        let ana = register(&app, "Ana", "ana@uni.edu").await;
        let kardex = create_procedure(&app, "Kardex", 5).await;

        let response = post_json(
            &app,
            &format!("/procedure_types/{kardex}/status"),
            serde_json::json!({ "status": "suspended" }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = post_json(
            &app,
            "/tickets",
            serde_json::json!({ "student_id": ana, "procedure_type_id": kardex }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wait_estimate_endpoint() {
        let app: Router = build_router(create_test_app_state());
        let ana = register(&app, "Ana", "ana@uni.edu").await;
        let luis = register(&app, "Luis", "luis@uni.edu").await;
        let titulacion = create_procedure(&app, "Titulacion", 30).await;
        admit(&app, ana, titulacion).await;
        admit(&app, luis, titulacion).await;

        let response = get_uri(&app, &format!("/procedure_types/{titulacion}/wait_estimate")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["waiting_count"], 2);
        assert_eq!(body["data"]["estimated_wait_minutes"], 60);
    }

    #[tokio::test]
    async fn test_current_ticket_and_history() {
        let app: Router = build_router(create_test_app_state());
        let ana = register(&app, "Ana", "ana@uni.edu").await;
        let kardex = create_procedure(&app, "Kardex", 5).await;
        let ticket = admit(&app, ana, kardex).await;

        let response = get_uri(&app, &format!("/students/{ana}/current_ticket")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["ticket_id"], ticket["ticket_id"]);

        let ticket_id = ticket["ticket_id"].as_i64().unwrap();
        let response = post_empty(&app, &format!("/tickets/{ticket_id}/cancel")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = get_uri(&app, &format!("/students/{ana}/current_ticket")).await;
        let body = body_json(response).await;
        assert!(body["data"].is_null());

        let response = get_uri(&app, &format!("/students/{ana}/tickets?state=cancelado")).await;
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let response = get_uri(&app, &format!("/students/{ana}/tickets?state=bogus")).await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }
}
