//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{Hub, RoomId, RoomSnapshot};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    hub: Arc<Hub>,
}

impl GetRoomDetailUseCase {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    pub async fn execute(&self, room_id: String) -> Result<RoomSnapshot, GetRoomDetailError> {
        let room_id = RoomId::new(room_id)?;
        self.hub
            .room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
