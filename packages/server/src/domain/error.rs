//! ドメイン層のエラー型

use thiserror::Error;

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    RoomIdEmpty,

    #[error("room id must be at most {0} characters")]
    RoomIdTooLong(usize),

    #[error("room id contains an invalid character: '{0}'")]
    RoomIdInvalidCharacter(String),

    #[error("participant name must not be empty")]
    ParticipantNameEmpty,

    #[error("participant name must be at most {0} characters")]
    ParticipantNameTooLong(usize),
}

/// メッセージストアのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageStoreError {
    #[error("message store unavailable: {0}")]
    Unavailable(String),
}
