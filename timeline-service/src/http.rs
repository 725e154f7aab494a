use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use timeline_core::errors::TimelineError;
use timeline_protocol::{EntryDraft, TimelineEntry, TimelineOrder, TimelineQuery};

use crate::repository::TimelineRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: TimelineRepository,
}

/// Builds the service router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/timeline", get(list_entries).post(create_entry))
        .route(
            "/api/v1/timeline/:id",
            axum::routing::put(update_entry).delete(delete_entry),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "ok"
}

type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: u32,
}

async fn create_entry(
    State(state): State<AppState>,
    Json(draft): Json<EntryDraft>,
) -> AppResult<impl IntoResponse> {
    check_bounds(&draft)?;
    let id = state.repository.create_entry(&draft).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> AppResult<Json<Vec<TimelineEntry>>> {
    let entries = match query.label {
        Some(label) => state.repository.list_by_label(label).await?,
        None => match query.order {
            TimelineOrder::CreateTime => state.repository.list_by_create_time().await?,
            TimelineOrder::EventTime => state.repository.list_by_event_time().await?,
        },
    };

    Ok(Json(entries))
}

async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(draft): Json<EntryDraft>,
) -> AppResult<StatusCode> {
    check_bounds(&draft)?;
    state.repository.update_entry(id, &draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<StatusCode> {
    state.repository.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn check_bounds(draft: &EntryDraft) -> AppResult<()> {
    if draft.fits_schema() {
        Ok(())
    } else {
        Err(AppError::bad_request("title or value exceeds column bounds"))
    }
}

#[derive(Debug, Clone)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request<M: Into<String>>(message: M) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found<M: Into<String>>(message: M) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal<M: Into<String>>(message: M) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<TimelineError> for AppError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::NoRowsAffected(message) => AppError::not_found(message),
            other => AppError::internal(other.to_string()),
        }
    }
}
