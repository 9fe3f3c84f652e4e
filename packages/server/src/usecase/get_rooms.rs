//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{Hub, RoomSnapshot};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    hub: Arc<Hub>,
}

impl GetRoomsUseCase {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    /// 参加者のいるルームをルーム ID 順に返す
    pub async fn execute(&self) -> Vec<RoomSnapshot> {
        self.hub.rooms().await
    }
}
