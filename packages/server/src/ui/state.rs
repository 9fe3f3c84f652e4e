//! Shared application state.

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::{
    config::HeartbeatConfig,
    domain::{Hub, MessageStore},
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetMessageHistoryUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（ルーム参加のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（ルーム退出のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ配信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetMessageHistoryUseCase（メッセージ履歴取得のユースケース）
    pub get_message_history_usecase: Arc<GetMessageHistoryUseCase>,
    /// 接続ごとのタイムアウト・バッファ設定
    pub heartbeat: HeartbeatConfig,
}

impl AppState {
    /// Wire every use case against one hub and message store.
    pub fn new(
        hub: Arc<Hub>,
        store: Arc<dyn MessageStore>,
        clock: Arc<dyn Clock>,
        heartbeat: HeartbeatConfig,
    ) -> Self {
        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                hub.clone(),
                clock.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                hub.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(hub.clone(), clock)),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(hub.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(hub)),
            get_message_history_usecase: Arc::new(GetMessageHistoryUseCase::new(store)),
            heartbeat,
        }
    }
}
