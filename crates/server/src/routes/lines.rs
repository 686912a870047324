use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use models::line::{CreateLineInput, LineResponse, UpdateLineInput};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// List all lines in creation order.
pub async fn list_lines(State(state): State<ServerState>) -> Json<Vec<LineResponse>> {
    let list: Vec<LineResponse> = state.lines.list().await.iter().map(LineResponse::from).collect();
    info!(count = list.len(), "list lines");
    Json(list)
}

/// Create a line. Duplicate names are a 409, not a server fault.
pub async fn create_line(
    State(state): State<ServerState>,
    Json(input): Json<CreateLineInput>,
) -> Result<(StatusCode, Json<LineResponse>), JsonApiError> {
    match state.lines.create(input).await {
        Ok(line) => {
            info!(id = line.id, name = %line.name, "created line");
            Ok((StatusCode::CREATED, Json(LineResponse::from(line))))
        }
        Err(e) => Err(e.into()),
    }
}

/// Get a line by id.
pub async fn get_line(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<LineResponse>, StatusCode> {
    match state.lines.get(id).await {
        Some(line) => Ok(Json(LineResponse::from(line))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Update name/color in place; success is 200 with no body.
pub async fn update_line(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateLineInput>,
) -> Result<StatusCode, JsonApiError> {
    match state.lines.update(id, input).await {
        Ok(line) => {
            info!(id = line.id, name = %line.name, "updated line");
            Ok(StatusCode::OK)
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a line by id.
pub async fn delete_line(State(state): State<ServerState>, Path(id): Path<i64>) -> StatusCode {
    match state.lines.delete(id).await {
        Ok(true) => {
            info!(id, "deleted line");
            StatusCode::NO_CONTENT
        }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete line failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
