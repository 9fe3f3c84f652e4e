//! Infrastructure 層
//!
//! - `dto`: WebSocket / HTTP のワイヤフォーマット
//! - `repository`: ドメイン層の `MessageStore` の実装

pub mod dto;
pub mod repository;
