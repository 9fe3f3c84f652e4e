//! Entity 定義

use super::value_object::{ConnectionId, ParticipantName, RoomId, Timestamp};

/// チャットメッセージ
///
/// ハブはメッセージを保持しない。ストアに渡してからシリアライズして配信する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub room_id: RoomId,
    pub sender: ParticipantName,
    pub text: String,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    pub fn new(room_id: RoomId, sender: ParticipantName, text: String, sent_at: Timestamp) -> Self {
        Self {
            room_id,
            sender,
            text,
            sent_at,
        }
    }
}

/// ルームに参加中の接続
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub name: ParticipantName,
    pub joined_at: Timestamp,
}

/// ある時点でのルームの状態（読み取り専用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub created_at: Timestamp,
    /// 参加時刻の昇順
    pub participants: Vec<Participant>,
}
