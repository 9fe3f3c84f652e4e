//! WebSocket フレームの DTO

use serde::{Deserialize, Serialize};

/// ウェルカムメッセージの送信者
pub const WELCOME_SENDER: &str = "Admin";
/// ウェルカムメッセージの本文
pub const WELCOME_TEXT: &str = "Welcome!";

/// クライアント → サーバー
///
/// `text` 以外のフィールドは無視する。`text` がない、または文字列でない
/// フレームはパースに失敗する。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingMessage {
    pub text: String,
}

impl IncomingMessage {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// サーバー → クライアント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub sender: String,
    pub text: String,
}

impl OutgoingMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }

    pub fn welcome() -> Self {
        Self::new(WELCOME_SENDER, WELCOME_TEXT)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
