//! ドメインモデル → DTO の変換

use hiroba_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{ChatMessage, Participant, RoomSnapshot, Timestamp};

use super::http::{MessageDto, ParticipantDetailDto, RoomDetailDto, RoomSummaryDto};

fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp_to_jst_rfc3339(timestamp.value()).unwrap_or_default()
}

impl From<ChatMessage> for MessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            sender: message.sender.into_string(),
            text: message.text,
            sent_at: format_timestamp(message.sent_at),
            sent_at_millis: message.sent_at.value(),
        }
    }
}

impl From<Participant> for ParticipantDetailDto {
    fn from(participant: Participant) -> Self {
        Self {
            connection_id: participant.connection_id.to_string(),
            name: participant.name.into_string(),
            joined_at: format_timestamp(participant.joined_at),
        }
    }
}

impl From<RoomSnapshot> for RoomSummaryDto {
    fn from(room: RoomSnapshot) -> Self {
        Self {
            id: room.id.into_string(),
            participants: room
                .participants
                .into_iter()
                .map(|p| p.name.into_string())
                .collect(),
            created_at: format_timestamp(room.created_at),
        }
    }
}

impl From<RoomSnapshot> for RoomDetailDto {
    fn from(room: RoomSnapshot) -> Self {
        Self {
            id: room.id.into_string(),
            participants: room.participants.into_iter().map(Into::into).collect(),
            created_at: format_timestamp(room.created_at),
        }
    }
}
