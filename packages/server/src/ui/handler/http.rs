//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    infrastructure::dto::http::{MessageDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::{GetMessageHistoryError, GetRoomDetailError},
};

/// Query parameters for the message history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Only messages sent before this time (epoch millis)
    pub before: Option<i64>,
    pub limit: Option<usize>,
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.into_iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => Ok(Json(RoomDetailDto::from(room))),
        Err(GetRoomDetailError::InvalidRoomId(e)) => {
            tracing::debug!("Rejected room detail request: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

/// Get the most recent messages of a room, oldest first
///
/// Pass the `sent_at` of the first returned message as `?before=` to load
/// the previous page.
pub async fn get_message_history(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageDto>>, StatusCode> {
    match state
        .get_message_history_usecase
        .execute(room_id, query.before, query.limit)
        .await
    {
        Ok(messages) => Ok(Json(messages.into_iter().map(MessageDto::from).collect())),
        Err(GetMessageHistoryError::InvalidRoomId(e)) => {
            tracing::debug!("Rejected history request: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(GetMessageHistoryError::Store(e)) => {
            tracing::error!("Failed to load message history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
