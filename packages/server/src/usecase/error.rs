//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{MessageStoreError, ValueObjectError};

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("invalid room id: {0}")]
    InvalidRoomId(#[from] ValueObjectError),

    #[error("room not found")]
    RoomNotFound,
}

/// メッセージ履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessageHistoryError {
    #[error("invalid room id: {0}")]
    InvalidRoomId(#[from] ValueObjectError),

    #[error(transparent)]
    Store(#[from] MessageStoreError),
}
