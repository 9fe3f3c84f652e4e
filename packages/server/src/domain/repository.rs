//! Repository trait 定義
//!
//! メッセージの永続化はハブの外側の責務です。ハブはこの trait を通して
//! 保存を依頼するだけで、結果によって配信を止めることはありません。

use async_trait::async_trait;

use super::{ChatMessage, MessageStoreError, RoomId, Timestamp};

/// Message Store trait（永続化フック）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを保存
    async fn save(&self, message: ChatMessage) -> Result<(), MessageStoreError>;

    /// ルームの直近のメッセージを古い順に最大 `limit` 件取得
    ///
    /// `before` を指定すると、その時刻より前（`sent_at < before`）のメッセージだけを
    /// 対象にする。返された先頭の `sent_at` を次の `before` に渡すと過去に遡れる。
    async fn recent(
        &self,
        room_id: RoomId,
        before: Option<Timestamp>,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, MessageStoreError>;
}
