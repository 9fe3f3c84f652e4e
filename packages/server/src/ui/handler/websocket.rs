//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{future, sink::SinkExt, stream::StreamExt};
use serde::Deserialize;

use crate::{
    domain::{ParticipantName, RoomId},
    ui::{
        connection::{ConnectionError, Frame, serve_connection},
        state::AppState,
    },
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: String,
}

/// `GET /ws/{room_id}?username=<name>`
///
/// Validates the room id and display name before upgrading. The participant
/// joins the room once the upgrade completes.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = RoomId::try_from(room_id).map_err(|e| {
        tracing::warn!("Rejected connection with invalid room id: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let participant = ParticipantName::try_from(query.username).map_err(|e| {
        tracing::warn!("Rejected connection with invalid username: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    tracing::info!("'{}' is joining room '{}'", participant, room_id);

    let max_message_size = state.heartbeat.max_message_size;
    Ok(ws
        .max_message_size(max_message_size)
        .max_frame_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state, room_id, participant)))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    participant: ParticipantName,
) {
    let (sender, receiver) = socket.split();

    let sink = sender
        .sink_map_err(ConnectionError::transport)
        .with(|frame: Frame| future::ready(Ok::<_, ConnectionError>(Message::from(frame))));
    let stream = receiver.map(|message| {
        message
            .map(Frame::from)
            .map_err(ConnectionError::transport)
    });

    serve_connection(state, room_id, participant, stream, sink).await;
}

impl From<Message> for Frame {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Frame::Text(text.as_str().to_owned()),
            Message::Binary(data) => Frame::Binary(data.to_vec()),
            Message::Ping(_) => Frame::Ping,
            Message::Pong(_) => Frame::Pong,
            Message::Close(_) => Frame::Close,
        }
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(data) => Message::Binary(data.into()),
            Frame::Ping => Message::Ping(Bytes::new()),
            Frame::Pong => Message::Pong(Bytes::new()),
            Frame::Close => Message::Close(None),
        }
    }
}
