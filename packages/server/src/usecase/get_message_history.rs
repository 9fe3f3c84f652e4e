//! UseCase: メッセージ履歴取得

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageStore, RoomId, Timestamp};

use super::error::GetMessageHistoryError;

/// `limit` を省略したときの件数
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
/// `limit` の上限
pub const MAX_HISTORY_LIMIT: usize = 200;

/// メッセージ履歴取得のユースケース
pub struct GetMessageHistoryUseCase {
    store: Arc<dyn MessageStore>,
}

impl GetMessageHistoryUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// 直近のメッセージを古い順に返す
    ///
    /// `before`（ミリ秒）を指定すると、それより前のメッセージを返す。
    /// `limit` は `MAX_HISTORY_LIMIT` で頭打ちになる。
    pub async fn execute(
        &self,
        room_id: String,
        before: Option<i64>,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, GetMessageHistoryError> {
        let room_id = RoomId::new(room_id)?;
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT);
        Ok(self
            .store
            .recent(room_id, before.map(Timestamp::new), limit)
            .await?)
    }
}
