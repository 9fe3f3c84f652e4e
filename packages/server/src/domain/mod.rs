//! ドメイン層
//!
//! - `value_object`: 検証済みの ID / 名前
//! - `entity`: メッセージとルームのスナップショット
//! - `repository`: 永続化フックの trait
//! - `hub`: ルームと接続のインメモリレジストリ（配信の中核）

pub mod entity;
pub mod error;
pub mod hub;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Participant, RoomSnapshot};
pub use error::{MessageStoreError, ValueObjectError};
pub use hub::{BroadcastReport, Hub, Member, OutboundReceiver};
pub use repository::MessageStore;
pub use value_object::{ConnectionId, ParticipantName, RoomId, Timestamp};
