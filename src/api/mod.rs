//! # HTTP API
//!
//! Thin creation-facing surface over the core operations. Request bodies
//! are loosely-typed DTOs validated into strict domain inputs before any
//! core operation runs; core failures map onto HTTP statuses (validation
//! 400, not-found 404, everything else 500).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0
//!
//! ## Endpoints
//!
//! - `POST /api/clients` — register a client
//! - `GET  /api/clients` — list clients, newest first
//! - `POST /api/reminders` — schedule a reminder
//! - `GET  /api/reminders` — list reminders, newest first
//! - `POST /api/reminders/{id}/send` — send immediately, outside the poll cycle
//! - `GET  /api/log` — recent activity entries
//! - `GET  /api/export` — full state snapshot, read-only

use crate::app::App;
use crate::core::AppError;
use crate::features::activity::RECENT_LIMIT;
use crate::features::reminders::{parse_fire_time, ReminderScheduler};
use crate::models::{Client, LogEntry, NewClient, NewReminder, Reminder, RepeatPolicy};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Shared state for the axum handlers.
#[derive(Clone)]
pub struct ApiState {
    pub app: App,
    pub scheduler: ReminderScheduler,
}

/// Build the API router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/clients", post(create_client).get(list_clients))
        .route("/api/reminders", post(create_reminder).get(list_reminders))
        .route("/api/reminders/{id}/send", post(send_now))
        .route("/api/log", get(recent_log))
        .route("/api/export", get(export))
        .with_state(state)
}

/// Loosely-typed client creation body; required fields are enforced by the
/// core so their absence surfaces as a validation error, not a decode error.
#[derive(Debug, Deserialize)]
struct CreateClientRequest {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateReminderRequest {
    client_id: Option<i64>,
    fire_at: Option<String>,
    message: Option<String>,
    repeat: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LogQuery {
    limit: Option<usize>,
}

/// Read-only snapshot of the whole service state.
#[derive(Debug, Serialize)]
struct ExportSnapshot {
    clients: Vec<Client>,
    reminders: Vec<Reminder>,
    log: Vec<LogEntry>,
}

/// Error wrapper translating [`AppError`] into an HTTP response.
struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Dispatch(_) => (StatusCode::INTERNAL_SERVER_ERROR, "dispatch"),
            AppError::Scheduler(_) => (StatusCode::INTERNAL_SERVER_ERROR, "scheduler"),
        };
        let body = Json(json!({
            "error": {
                "kind": kind,
                "message": self.0.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

async fn create_client(
    State(state): State<ApiState>,
    Json(req): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let client = state
        .app
        .clients
        .add_client(NewClient {
            name: req.name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            phone: req.phone,
            notes: req.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn list_clients(State(state): State<ApiState>) -> Json<Vec<Client>> {
    Json(state.app.clients.list_clients().await)
}

async fn create_reminder(
    State(state): State<ApiState>,
    Json(req): Json<CreateReminderRequest>,
) -> Result<(StatusCode, Json<Reminder>), ApiError> {
    let client_id = req
        .client_id
        .ok_or_else(|| AppError::validation("client_id is required"))?;
    let fire_at_raw = req
        .fire_at
        .ok_or_else(|| AppError::validation("fire_at is required"))?;
    let fire_at = parse_fire_time(&fire_at_raw)?;

    let reminder = state
        .app
        .reminders
        .add_reminder(NewReminder {
            client_id,
            fire_at,
            message: req.message.unwrap_or_default(),
            repeat: RepeatPolicy::parse(req.repeat.as_deref()),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

async fn list_reminders(State(state): State<ApiState>) -> Json<Vec<Reminder>> {
    Json(state.app.reminders.list_reminders().await)
}

async fn send_now(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Reminder>, ApiError> {
    let reminder = state.scheduler.run_now(id).await?;
    Ok(Json(reminder))
}

async fn recent_log(
    State(state): State<ApiState>,
    Query(query): Query<LogQuery>,
) -> Json<Vec<LogEntry>> {
    let limit = query.limit.unwrap_or(RECENT_LIMIT);
    Json(state.app.activity.recent(limit).await)
}

async fn export(State(state): State<ApiState>) -> Json<ExportSnapshot> {
    Json(ExportSnapshot {
        clients: state.app.clients.list_clients().await,
        reminders: state.app.reminders.list_reminders().await,
        log: state.app.activity.recent(RECENT_LIMIT).await,
    })
}
