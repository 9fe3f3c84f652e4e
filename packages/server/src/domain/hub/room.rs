//! ルーム: メンバー集合と配信（fan-out）

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomId, RoomSnapshot, Timestamp};

use super::member::{Delivery, Member, OutboundFrame};

/// 1 回の配信の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// バッファに積めたメンバー数
    pub delivered: usize,
    /// この配信で追い出したメンバー
    pub evicted: Vec<ConnectionId>,
}

/// 同じルーム ID を共有する接続の集合
///
/// メンバー集合の変更と配信はすべて `members` のロックの中で行う。
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    created_at: Timestamp,
    members: Mutex<HashMap<ConnectionId, Member>>,
}

impl Room {
    pub(super) fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            members: Mutex::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub(super) async fn insert(&self, member: Member) {
        let mut members = self.members.lock().await;
        members.insert(member.connection_id(), member);
    }

    pub(super) async fn remove(&self, connection_id: &ConnectionId) -> Option<Member> {
        let mut members = self.members.lock().await;
        members.remove(connection_id)
    }

    /// 全メンバーを外す。外したメンバー数を返す。
    pub(super) async fn clear(&self) -> usize {
        let mut members = self.members.lock().await;
        let count = members.len();
        members.clear();
        count
    }

    pub async fn is_empty(&self) -> bool {
        self.members.lock().await.is_empty()
    }

    /// 全メンバーの送信バッファにフレームを積む
    ///
    /// 積めなかったメンバー（満杯または受信側が終了）はこの走査の中で
    /// 集合から外す。外されたメンバーは drop され、送信バッファが閉じる。
    /// 1 人の遅い受信者が他のメンバーへの配信を止めることはない。
    pub(super) async fn fan_out(&self, frame: &str) -> BroadcastReport {
        let frame = OutboundFrame::from(frame);
        let mut members = self.members.lock().await;
        let mut report = BroadcastReport::default();

        members.retain(|connection_id, member| match member.try_deliver(&frame) {
            Delivery::Queued => {
                report.delivered += 1;
                true
            }
            Delivery::Full => {
                tracing::warn!(
                    "Evicting slow consumer '{}' ({}) from room '{}'",
                    member.name(),
                    connection_id,
                    self.id
                );
                report.evicted.push(*connection_id);
                false
            }
            Delivery::Closed => {
                tracing::debug!(
                    "Dropping closed connection '{}' ({}) from room '{}'",
                    member.name(),
                    connection_id,
                    self.id
                );
                report.evicted.push(*connection_id);
                false
            }
        });

        report
    }

    pub async fn snapshot(&self) -> RoomSnapshot {
        let members = self.members.lock().await;
        let mut participants: Vec<_> = members.values().map(Member::participant).collect();
        participants.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.name.as_str().cmp(b.name.as_str()))
        });

        RoomSnapshot {
            id: self.id.clone(),
            created_at: self.created_at,
            participants,
        }
    }
}
