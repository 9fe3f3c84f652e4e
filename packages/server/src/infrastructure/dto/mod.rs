//! Data Transfer Objects
//!
//! - `websocket`: WebSocket で送受信する JSON フレーム
//! - `http`: HTTP API のレスポンス
//! - `conversion`: ドメインモデル → DTO の変換

pub mod conversion;
pub mod http;
pub mod websocket;
