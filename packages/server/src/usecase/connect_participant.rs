//! UseCase: 参加者接続処理
//!
//! 接続 1 本分のメンバーを作ってルームに登録し、write pump が読む送信バッファの
//! 受信側を返します。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ConnectionId, Hub, Member, OutboundReceiver, ParticipantName, RoomId, Timestamp};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    hub: Arc<Hub>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    pub fn new(hub: Arc<Hub>, clock: Arc<dyn Clock>) -> Self {
        Self { hub, clock }
    }

    /// 参加者をルームに登録
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加するルーム
    /// * `name` - 参加者名（送信メッセージの sender になる）
    /// * `outbound_capacity` - 送信バッファの容量
    ///
    /// # Returns
    ///
    /// 接続 ID と送信バッファの受信側。失敗はしない。
    pub async fn execute(
        &self,
        room_id: RoomId,
        name: ParticipantName,
        outbound_capacity: usize,
    ) -> (ConnectionId, OutboundReceiver) {
        let joined_at = Timestamp::new(self.clock.now_millis());
        let (member, receiver) = Member::new(name, joined_at, outbound_capacity);
        let connection_id = member.connection_id();

        self.hub.join_room(room_id, member).await;

        (connection_id, receiver)
    }
}
