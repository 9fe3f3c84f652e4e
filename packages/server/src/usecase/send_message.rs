//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者名と時刻を付けたメッセージの保存とブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じルームの全員（送信者を含む）に配信される
//! - エッジケース：ルームが存在しない場合は何もしない

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{BroadcastReport, ChatMessage, Hub, ParticipantName, RoomId, Timestamp};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    hub: Arc<Hub>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(hub: Arc<Hub>, clock: Arc<dyn Clock>) -> Self {
        Self { hub, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先ルーム
    /// * `sender` - 送信者（接続の参加者名）
    /// * `text` - 本文
    /// * `frame` - 配信する JSON フレーム（DTO 層で生成されたもの）
    pub async fn execute(
        &self,
        room_id: RoomId,
        sender: ParticipantName,
        text: String,
        frame: &str,
    ) -> BroadcastReport {
        let sent_at = Timestamp::new(self.clock.now_millis());
        let message = ChatMessage::new(room_id, sender, text, sent_at);
        self.hub.broadcast(message, frame).await
    }
}
