//! HTTP API の DTO

use serde::{Deserialize, Serialize};

/// `GET /api/rooms` の要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub participants: Vec<String>,
    pub created_at: String,
}

/// `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub connection_id: String,
    pub name: String,
    pub joined_at: String,
}

/// `GET /api/rooms/{room_id}/messages` の要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub sender: String,
    pub text: String,
    pub sent_at: String,
    /// `sent_at` in epoch millis; pass as `?before=` to page backwards
    pub sent_at_millis: i64,
}
