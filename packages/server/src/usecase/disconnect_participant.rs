//! UseCase: 参加者切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, Hub, RoomId};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    hub: Arc<Hub>,
}

impl DisconnectParticipantUseCase {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    /// 参加者をルームから外す（何度呼んでもよい）
    ///
    /// 今回の呼び出しで外した場合は `true`。すでに外れていた場合
    /// （追い出し済み、シャットダウン済み）は `false`。
    pub async fn execute(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        self.hub.leave_room(room_id, connection_id).await
    }
}
