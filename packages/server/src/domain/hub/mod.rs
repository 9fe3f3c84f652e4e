//! ハブ: ルーム ID → ルームのインメモリレジストリ
//!
//! ## ロック
//!
//! - ハブのロック（`rooms`）とルームのロック（メンバー集合）の 2 段
//! - 取得順は常に ハブ → ルーム
//! - `join_room` はハブのロックを保持したままメンバーを追加するので、
//!   空になったルームの削除と競合しても、削除済みのルームに参加することはない
//!
//! ## 空のルーム
//!
//! 最後のメンバーが抜けた（または追い出された）ルームはマップから削除する。

pub mod member;
pub mod room;

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use super::{ChatMessage, ConnectionId, MessageStore, RoomId, RoomSnapshot};

pub use member::{Member, OutboundReceiver};
pub use room::{BroadcastReport, Room};

/// ルームのレジストリ
///
/// プロセスに 1 つ作って `Arc` で共有する。テストでは独立したハブを
/// いくつでも作れる。
pub struct Hub {
    rooms: Mutex<HashMap<RoomId, Arc<Room>>>,
    /// 永続化フック
    store: Arc<dyn MessageStore>,
}

impl Hub {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            store,
        }
    }

    /// メンバーをルームに追加する（ルームがなければ作る）
    pub async fn join_room(&self, room_id: RoomId, member: Member) {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .entry(room_id)
            .or_insert_with_key(|room_id| {
                tracing::info!("Room '{}' created", room_id);
                Arc::new(Room::new(room_id.clone(), member.joined_at()))
            })
            .clone();

        tracing::info!(
            "'{}' ({}) joined room '{}'",
            member.name(),
            member.connection_id(),
            room.id()
        );
        room.insert(member).await;
    }

    /// メンバーをルームから外す
    ///
    /// ルームがない、またはメンバーでない場合は何もしない。
    /// 外した場合は `true` を返す。
    pub async fn leave_room(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get(room_id).cloned() else {
            return false;
        };

        let removed = room.remove(connection_id).await;
        if let Some(member) = &removed {
            tracing::info!(
                "'{}' ({}) left room '{}'",
                member.name(),
                connection_id,
                room_id
            );
        }

        if room.is_empty().await {
            rooms.remove(room_id);
            tracing::info!("Room '{}' is empty and was removed", room_id);
        }

        removed.is_some()
    }

    /// ルームの全メンバーにフレームを配信する
    ///
    /// ルームがなければ何もしない（保存もしない）。保存の失敗はログに残すだけで
    /// 配信は続ける。遅い受信者は配信中に追い出される。失敗を返すことはない。
    pub async fn broadcast(&self, message: ChatMessage, frame: &str) -> BroadcastReport {
        let room = {
            let rooms = self.rooms.lock().await;
            rooms.get(&message.room_id).cloned()
        };
        let Some(room) = room else {
            tracing::debug!(
                "Room '{}' has no members, dropping message",
                message.room_id
            );
            return BroadcastReport::default();
        };

        let sender = message.sender.clone();
        if let Err(e) = self.store.save(message).await {
            tracing::warn!("Failed to save message from '{}': {}", sender, e);
        }

        let report = room.fan_out(frame).await;
        tracing::debug!(
            "Broadcasted message from '{}' in room '{}' to {} member(s), evicted {}",
            sender,
            room.id(),
            report.delivered,
            report.evicted.len()
        );

        if !report.evicted.is_empty() {
            self.prune_if_empty(&room).await;
        }

        report
    }

    /// 全ルームの全メンバーを外す（シャットダウン用）
    ///
    /// 外したメンバー数を返す。各接続の write pump は close フレームを送って終了する。
    pub async fn close_all(&self) -> usize {
        let mut rooms = self.rooms.lock().await;
        let mut closed = 0;
        for room in rooms.values() {
            closed += room.clear().await;
        }
        rooms.clear();
        tracing::info!("Closed {} connection(s) on shutdown", closed);
        closed
    }

    /// ルームの状態を取得
    pub async fn room(&self, room_id: &RoomId) -> Option<RoomSnapshot> {
        let room = {
            let rooms = self.rooms.lock().await;
            rooms.get(room_id).cloned()
        }?;
        Some(room.snapshot().await)
    }

    /// 全ルームの状態をルーム ID 順に取得
    pub async fn rooms(&self) -> Vec<RoomSnapshot> {
        let rooms: Vec<Arc<Room>> = {
            let rooms = self.rooms.lock().await;
            rooms.values().cloned().collect()
        };

        let mut snapshots = Vec::with_capacity(rooms.len());
        for room in rooms {
            snapshots.push(room.snapshot().await);
        }
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// 追い出しで空になったルームを削除する
    ///
    /// 調べたルームと同じインスタンスがまだ登録されている場合だけ削除する。
    async fn prune_if_empty(&self, room: &Arc<Room>) {
        let mut rooms = self.rooms.lock().await;
        let registered = rooms
            .get(room.id())
            .is_some_and(|current| Arc::ptr_eq(current, room));
        if registered && room.is_empty().await {
            rooms.remove(room.id());
            tracing::info!("Room '{}' is empty after eviction and was removed", room.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        MessageStoreError, ParticipantName, Timestamp, repository::MockMessageStore,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - join / leave によるメンバー集合の変更
    // - 同じルーム ID への同時参加でルームが 1 つしか作られないこと
    // - 配信（送信者自身を含む）、遅い受信者の追い出し
    // - 保存の失敗が配信を止めないこと
    // - 空になったルームの削除
    // ========================================

    fn accepting_store() -> Arc<MockMessageStore> {
        let mut store = MockMessageStore::new();
        store.expect_save().returning(|_| Ok(()));
        Arc::new(store)
    }

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn member(name: &str, capacity: usize) -> (Member, OutboundReceiver) {
        Member::new(
            ParticipantName::new(name.to_string()).unwrap(),
            Timestamp::new(1_000),
            capacity,
        )
    }

    fn message(room: &str, sender: &str, text: &str) -> ChatMessage {
        ChatMessage::new(
            room_id(room),
            ParticipantName::new(sender.to_string()).unwrap(),
            text.to_string(),
            Timestamp::new(2_000),
        )
    }

    #[tokio::test]
    async fn test_join_creates_room_on_demand() {
        // テスト項目: 存在しないルームに参加するとルームが 1 つ作られる
        // given (前提条件):
        let hub = Hub::new(accepting_store());
        let (alice, _rx) = member("alice", 8);

        // when (操作):
        hub.join_room(room_id("r1"), alice).await;

        // then (期待する結果):
        assert_eq!(hub.room_count().await, 1);
        let snapshot = hub.room(&room_id("r1")).await.unwrap();
        assert_eq!(snapshot.participants.len(), 1);
        assert_eq!(snapshot.participants[0].name.as_str(), "alice");
        assert_eq!(snapshot.created_at, Timestamp::new(1_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_joins_create_single_room() {
        // テスト項目: 同じ新規ルームへの同時参加でもルームは 1 つしか作られない
        // given (前提条件):
        let hub = Arc::new(Hub::new(accepting_store()));
        let mut receivers = Vec::new();
        let mut handles = Vec::new();

        // when (操作):
        for i in 0..32 {
            let (m, rx) = member(&format!("user{i}"), 8);
            receivers.push(rx);
            let hub = hub.clone();
            handles.push(tokio::spawn(async move {
                hub.join_room(room_id("race"), m).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(hub.room_count().await, 1);
        let snapshot = hub.room(&room_id("race")).await.unwrap();
        assert_eq!(snapshot.participants.len(), 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_join_broadcast_leave_churn_leaves_no_rooms() {
        // テスト項目: 参加・配信・退出を並行に繰り返しても、最後にはルームが残らない
        // （空ルームの削除と新規参加が競合しても、削除済みのルームに参加しない）
        // given (前提条件):
        let hub = Arc::new(Hub::new(accepting_store()));

        for round in 0..200 {
            // when (操作):
            let mut handles = Vec::new();
            for i in 0..16 {
                let hub = hub.clone();
                handles.push(tokio::spawn(async move {
                    let (m, _rx) = member(&format!("user{i}"), 8);
                    let connection_id = m.connection_id();
                    hub.join_room(room_id("r"), m).await;
                    hub.broadcast(message("r", &format!("user{i}"), "hi"), "frame")
                        .await;
                    hub.leave_room(&room_id("r"), &connection_id).await;
                }));
            }
            for handle in handles {
                handle.await.unwrap();
            }

            // then (期待する結果):
            assert_eq!(hub.room_count().await, 0, "room left over after round {round}");
        }
    }

    #[tokio::test]
    async fn test_broadcast_reaches_other_member_and_sender() {
        // テスト項目: A の送信が B に届く（A 自身にもエコーされる）
        // given (前提条件):
        let hub = Hub::new(accepting_store());
        let (a, mut a_rx) = member("A", 8);
        let (b, mut b_rx) = member("B", 8);
        hub.join_room(room_id("r1"), a).await;
        hub.join_room(room_id("r1"), b).await;

        // when (操作):
        let frame = r#"{"sender":"A","text":"hi"}"#;
        let report = hub.broadcast(message("r1", "A", "hi"), frame).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert_eq!(b_rx.recv().await.as_deref(), Some(frame));
        assert_eq!(a_rx.recv().await.as_deref(), Some(frame));
    }

    #[tokio::test]
    async fn test_leave_stops_delivery() {
        // テスト項目: 退出したメンバーには以降の配信が行われない
        // given (前提条件):
        let hub = Hub::new(accepting_store());
        let (a, mut a_rx) = member("A", 8);
        let (b, _b_rx) = member("B", 8);
        let a_id = a.connection_id();
        hub.join_room(room_id("r1"), a).await;
        hub.join_room(room_id("r1"), b).await;

        // when (操作):
        let left = hub.leave_room(&room_id("r1"), &a_id).await;
        let report = hub.broadcast(message("r1", "B", "bye"), "frame").await;

        // then (期待する結果):
        assert!(left);
        assert_eq!(report.delivered, 1);
        assert_eq!(a_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_broadcast_to_room_after_last_leave_is_noop() {
        // テスト項目: A が参加して退出したあとのルームへの配信は何もしない
        // given (前提条件): 保存も呼ばれないこと
        let mut store = MockMessageStore::new();
        store.expect_save().never();
        let hub = Hub::new(Arc::new(store));
        let (a, _a_rx) = member("A", 8);
        let a_id = a.connection_id();
        hub.join_room(room_id("r1"), a).await;
        hub.leave_room(&room_id("r1"), &a_id).await;

        // when (操作):
        let report = hub.broadcast(message("r1", "A", "hello?"), "frame").await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
        assert_eq!(hub.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_leave_unknown_room_or_member_is_noop() {
        // テスト項目: 存在しないルーム / メンバーの退出はエラーにならない
        // given (前提条件):
        let hub = Hub::new(accepting_store());
        let (a, _a_rx) = member("A", 8);
        hub.join_room(room_id("r1"), a).await;
        let stranger = ConnectionId::generate();

        // when (操作):
        let unknown_room = hub.leave_room(&room_id("nowhere"), &stranger).await;
        let unknown_member = hub.leave_room(&room_id("r1"), &stranger).await;

        // then (期待する結果):
        assert!(!unknown_room);
        assert!(!unknown_member);
        assert_eq!(hub.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_slow_consumer_is_evicted_within_one_pass() {
        // テスト項目: バッファが満杯の B は 1 回の配信で追い出され、A への配信は止まらない
        // given (前提条件):
        let hub = Hub::new(accepting_store());
        let (a, mut a_rx) = member("A", 8);
        let (b, mut b_rx) = member("B", 2);
        let b_id = b.connection_id();
        hub.join_room(room_id("r1"), a).await;
        hub.join_room(room_id("r1"), b).await;
        hub.broadcast(message("r1", "A", "1"), "1").await;
        hub.broadcast(message("r1", "A", "2"), "2").await;

        // when (操作):
        let report = hub.broadcast(message("r1", "A", "3"), "3").await;

        // then (期待する結果):
        assert_eq!(report.evicted, vec![b_id]);
        let snapshot = hub.room(&room_id("r1")).await.unwrap();
        assert_eq!(snapshot.participants.len(), 1);
        assert_eq!(snapshot.participants[0].name.as_str(), "A");

        for expected in ["1", "2", "3"] {
            assert_eq!(a_rx.recv().await.as_deref(), Some(expected));
        }
        // B のバッファは閉じている（write pump は close フレームを送る）
        assert_eq!(b_rx.recv().await.as_deref(), Some("1"));
        assert_eq!(b_rx.recv().await.as_deref(), Some("2"));
        assert_eq!(b_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_room_removed_when_only_member_is_evicted() {
        // テスト項目: 唯一のメンバーが追い出されるとルームも削除される
        // given (前提条件):
        let hub = Hub::new(accepting_store());
        let (a, a_rx) = member("A", 8);
        hub.join_room(room_id("r1"), a).await;
        drop(a_rx);

        // when (操作):
        hub.broadcast(message("r1", "A", "x"), "x").await;

        // then (期待する結果):
        assert_eq!(hub.room_count().await, 0);
        assert!(hub.room(&room_id("r1")).await.is_none());
    }

    #[tokio::test]
    async fn test_store_failure_does_not_block_fan_out() {
        // テスト項目: 保存に失敗しても配信は行われる
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(MessageStoreError::Unavailable("disk full".to_string())));
        let hub = Hub::new(Arc::new(store));
        let (b, mut b_rx) = member("B", 8);
        hub.join_room(room_id("r1"), b).await;

        // when (操作):
        let report = hub.broadcast(message("r1", "A", "hi"), "frame").await;

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(b_rx.recv().await.as_deref(), Some("frame"));
    }

    #[tokio::test]
    async fn test_broadcast_persists_logical_message() {
        // テスト項目: 配信前にメッセージ（sender, text, room）が保存される
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_save()
            .withf(|m| m.room_id.as_str() == "r1" && m.sender.as_str() == "A" && m.text == "hi")
            .times(1)
            .returning(|_| Ok(()));
        let hub = Hub::new(Arc::new(store));
        let (a, _a_rx) = member("A", 8);
        hub.join_room(room_id("r1"), a).await;

        // when (操作):
        let report = hub.broadcast(message("r1", "A", "hi"), "frame").await;

        // then (期待する結果): times(1) の検証は drop 時に行われる
        assert_eq!(report.delivered, 1);
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        // テスト項目: 別のルームのメンバーには配信されない
        // given (前提条件):
        let hub = Hub::new(accepting_store());
        let (a, _a_rx) = member("A", 8);
        let (b, mut b_rx) = member("B", 8);
        hub.join_room(room_id("r1"), a).await;
        hub.join_room(room_id("r2"), b).await;

        // when (操作):
        hub.broadcast(message("r1", "A", "hi"), "frame").await;

        // then (期待する結果):
        assert!(b_rx.try_recv().is_err());
        let ids: Vec<String> = hub
            .rooms()
            .await
            .into_iter()
            .map(|r| r.id.into_string())
            .collect();
        assert_eq!(ids, vec!["r1".to_string(), "r2".to_string()]);
    }

    #[tokio::test]
    async fn test_close_all_closes_every_outbound_buffer() {
        // テスト項目: シャットダウン時に全接続の送信バッファが閉じ、ルームが空になる
        // given (前提条件):
        let hub = Hub::new(accepting_store());
        let (a, mut a_rx) = member("A", 8);
        let (b, mut b_rx) = member("B", 8);
        hub.join_room(room_id("r1"), a).await;
        hub.join_room(room_id("r2"), b).await;

        // when (操作):
        let closed = hub.close_all().await;

        // then (期待する結果):
        assert_eq!(closed, 2);
        assert_eq!(hub.room_count().await, 0);
        assert_eq!(a_rx.recv().await, None);
        assert_eq!(b_rx.recv().await, None);
    }
}
