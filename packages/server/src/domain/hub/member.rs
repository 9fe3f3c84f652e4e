//! ルームのメンバー（接続 1 本分の送信口）

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::{ConnectionId, Participant, ParticipantName, Timestamp};

/// シリアライズ済みフレーム。1 回の配信で全メンバーが同じバッファを共有する。
pub type OutboundFrame = Arc<str>;
/// 送信バッファの送信側
type OutboundSender = mpsc::Sender<OutboundFrame>;
/// 送信バッファの受信側。write pump だけが読む。
pub type OutboundReceiver = mpsc::Receiver<OutboundFrame>;

/// ルームが保持する接続の参照
///
/// 送信バッファの送信側はメンバーだけが持つ。メンバーがルームから外れて
/// drop されるとバッファが閉じ、write pump は close フレームを送って終了する。
#[derive(Debug)]
pub struct Member {
    connection_id: ConnectionId,
    name: ParticipantName,
    joined_at: Timestamp,
    outbound: OutboundSender,
}

/// 非ブロッキング enqueue の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Queued,
    /// バッファが満杯（遅い受信者）
    Full,
    /// write pump がすでに終了している
    Closed,
}

impl Member {
    /// メンバーと、その送信バッファの受信側を作る
    ///
    /// `capacity` が 0 の場合は 1 として扱う。
    pub fn new(
        name: ParticipantName,
        joined_at: Timestamp,
        capacity: usize,
    ) -> (Self, OutboundReceiver) {
        let (outbound, receiver) = mpsc::channel(capacity.max(1));
        let member = Self {
            connection_id: ConnectionId::generate(),
            name,
            joined_at,
            outbound,
        };
        (member, receiver)
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn name(&self) -> &ParticipantName {
        &self.name
    }

    pub fn joined_at(&self) -> Timestamp {
        self.joined_at
    }

    pub fn participant(&self) -> Participant {
        Participant {
            connection_id: self.connection_id,
            name: self.name.clone(),
            joined_at: self.joined_at,
        }
    }

    pub(crate) fn try_deliver(&self, frame: &OutboundFrame) -> Delivery {
        match self.outbound.try_send(Arc::clone(frame)) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(_)) => Delivery::Full,
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}
