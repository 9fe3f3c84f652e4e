//! UseCase 層
//!
//! UI 層（WebSocket / HTTP ハンドラ）から呼ばれるアプリケーションの操作。

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_message_history;
mod get_room_detail;
mod get_rooms;
mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{GetMessageHistoryError, GetRoomDetailError};
pub use get_message_history::{
    DEFAULT_HISTORY_LIMIT, GetMessageHistoryUseCase, MAX_HISTORY_LIMIT,
};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use send_message::SendMessageUseCase;
