//! InMemory Message Store 実装
//!
//! 外部のメッセージストアの代わりに、ルームごとの直近の履歴をメモリに保持します。
//! 容量を超えると古いメッセージから捨てます。

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageStore, MessageStoreError, RoomId, Timestamp};

/// ルームごとに保持する履歴のデフォルト件数
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// インメモリ Message Store 実装
pub struct InMemoryMessageStore {
    messages: Mutex<HashMap<RoomId, VecDeque<ChatMessage>>>,
    capacity_per_room: usize,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// ルームごとの保持件数を指定して作成（0 は 1 として扱う）
    pub fn with_capacity(capacity_per_room: usize) -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
            capacity_per_room: capacity_per_room.max(1),
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn save(&self, message: ChatMessage) -> Result<(), MessageStoreError> {
        let mut messages = self.messages.lock().await;
        let history = messages.entry(message.room_id.clone()).or_default();
        if history.len() == self.capacity_per_room {
            history.pop_front();
        }
        tracing::debug!(
            "Saved message from '{}' in room '{}'",
            message.sender,
            message.room_id
        );
        history.push_back(message);
        Ok(())
    }

    async fn recent(
        &self,
        room_id: RoomId,
        before: Option<Timestamp>,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, MessageStoreError> {
        let messages = self.messages.lock().await;
        let Some(history) = messages.get(&room_id) else {
            return Ok(Vec::new());
        };
        let mut page: Vec<ChatMessage> = history
            .iter()
            .rev()
            .filter(|m| before.is_none_or(|before| m.sent_at < before))
            .take(limit)
            .cloned()
            .collect();
        page.reverse();
        Ok(page)
    }
}
