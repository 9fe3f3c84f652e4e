//! Read pump, write pump and their supervisor.

use std::{sync::Arc, time::Duration};

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::{
    task::JoinError,
    time::{Instant, MissedTickBehavior, interval_at, timeout},
};

use crate::{
    config::HeartbeatConfig,
    domain::{ConnectionId, OutboundReceiver, ParticipantName, RoomId},
    infrastructure::dto::websocket::{IncomingMessage, OutgoingMessage},
    ui::state::AppState,
    usecase::SendMessageUseCase,
};

use super::{ConnectionError, Frame};

/// Identity of one connection: who is talking, in which room.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub connection_id: ConnectionId,
    pub room_id: RoomId,
    pub participant: ParticipantName,
}

/// Consume inbound frames until the peer goes away or stays silent too long.
///
/// Every received frame (including pongs) pushes the read deadline
/// `pong_wait` into the future. Malformed chat frames are dropped and the
/// pump keeps going. Returns `Ok(())` when the peer closes the connection.
pub async fn read_pump<S>(
    mut stream: S,
    context: ConnectionContext,
    send_message: Arc<SendMessageUseCase>,
    config: HeartbeatConfig,
) -> Result<(), ConnectionError>
where
    S: Stream<Item = Result<Frame, ConnectionError>> + Unpin,
{
    loop {
        let next = timeout(config.pong_wait, stream.next())
            .await
            .map_err(|_| ConnectionError::ReadTimeout(config.pong_wait))?;

        let Some(frame) = next else {
            tracing::debug!("Stream from '{}' ended", context.participant);
            return Ok(());
        };

        match frame? {
            Frame::Text(text) => {
                if text.len() > config.max_message_size {
                    return Err(ConnectionError::MessageTooLarge {
                        size: text.len(),
                        limit: config.max_message_size,
                    });
                }
                handle_text(&text, &context, &send_message).await;
            }
            Frame::Pong => tracing::trace!("Received pong from '{}'", context.participant),
            Frame::Ping => tracing::trace!("Received ping from '{}'", context.participant),
            Frame::Binary(data) => tracing::debug!(
                "Ignoring {} byte binary frame from '{}'",
                data.len(),
                context.participant
            ),
            Frame::Close => {
                tracing::info!("'{}' requested close", context.participant);
                return Ok(());
            }
        }
    }
}

async fn handle_text(text: &str, context: &ConnectionContext, send_message: &SendMessageUseCase) {
    let incoming = match IncomingMessage::parse(text) {
        Ok(incoming) => incoming,
        Err(e) => {
            tracing::warn!(
                "Dropping malformed frame from '{}': {}",
                context.participant,
                e
            );
            return;
        }
    };

    let frame = match OutgoingMessage::new(context.participant.as_str(), incoming.text.as_str())
        .to_json()
    {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Failed to encode message from '{}': {}", context.participant, e);
            return;
        }
    };

    send_message
        .execute(
            context.room_id.clone(),
            context.participant.clone(),
            incoming.text,
            &frame,
        )
        .await;
}

/// Drain the outbound buffer to the peer and keep the connection alive.
///
/// Pings go out every `ping_period`. When the buffer is closed (the member
/// left the room or was evicted) a close frame is written and the pump ends
/// with `Ok(())`. Any failed or timed-out write ends the pump with an error.
pub async fn write_pump<K>(
    mut sink: K,
    mut outbound: OutboundReceiver,
    config: HeartbeatConfig,
) -> Result<(), ConnectionError>
where
    K: Sink<Frame, Error = ConnectionError> + Unpin,
{
    let period = config.ping_period.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            next = outbound.recv() => match next {
                Some(text) => {
                    write_frame(&mut sink, Frame::Text(text.to_string()), config.write_wait).await?
                }
                None => {
                    write_frame(&mut sink, Frame::Close, config.write_wait).await?;
                    return Ok(());
                }
            },
            _ = ticker.tick() => write_frame(&mut sink, Frame::Ping, config.write_wait).await?,
        }
    }
}

async fn write_frame<K>(sink: &mut K, frame: Frame, write_wait: Duration) -> Result<(), ConnectionError>
where
    K: Sink<Frame, Error = ConnectionError> + Unpin,
{
    timeout(write_wait, sink.send(frame))
        .await
        .map_err(|_| ConnectionError::WriteTimeout(write_wait))?
}

/// Run one participant's connection from join to cleanup.
///
/// Registers the participant in `room_id`, writes the welcome frame directly
/// to the socket, then runs both pumps. Whichever pump ends first brings the
/// other one down, and the participant always leaves the room.
pub async fn serve_connection<S, K>(
    state: Arc<AppState>,
    room_id: RoomId,
    participant: ParticipantName,
    stream: S,
    sink: K,
) where
    S: Stream<Item = Result<Frame, ConnectionError>> + Send + 'static,
    K: Sink<Frame, Error = ConnectionError> + Send + 'static,
{
    let config = state.heartbeat;
    let (connection_id, outbound) = state
        .connect_participant_usecase
        .execute(room_id.clone(), participant.clone(), config.outbound_capacity)
        .await;
    let context = ConnectionContext {
        connection_id,
        room_id,
        participant,
    };

    let stream = Box::pin(stream);
    let mut sink = Box::pin(sink);

    if let Err(e) = send_welcome(&mut sink, config.write_wait).await {
        tracing::warn!("Failed to send welcome to '{}': {}", context.participant, e);
        state
            .disconnect_participant_usecase
            .execute(&context.room_id, &context.connection_id)
            .await;
        return;
    }

    let mut read_task = tokio::spawn(read_pump(
        stream,
        context.clone(),
        state.send_message_usecase.clone(),
        config,
    ));
    let mut write_task = tokio::spawn(write_pump(sink, outbound, config));

    tokio::select! {
        result = &mut read_task => {
            log_pump_exit("read", &context, result);
            // Leaving drops the outbound sender, so the write pump sends a close frame.
            state
                .disconnect_participant_usecase
                .execute(&context.room_id, &context.connection_id)
                .await;
            match timeout(config.write_wait, &mut write_task).await {
                Ok(result) => log_pump_exit("write", &context, result),
                Err(_) => write_task.abort(),
            }
        }
        result = &mut write_task => {
            log_pump_exit("write", &context, result);
            read_task.abort();
            state
                .disconnect_participant_usecase
                .execute(&context.room_id, &context.connection_id)
                .await;
        }
    }

    tracing::info!(
        "Connection {} of '{}' in room '{}' closed",
        context.connection_id,
        context.participant,
        context.room_id
    );
}

async fn send_welcome<K>(sink: &mut K, write_wait: Duration) -> Result<(), ConnectionError>
where
    K: Sink<Frame, Error = ConnectionError> + Unpin,
{
    let welcome = OutgoingMessage::welcome()
        .to_json()
        .map_err(|e| ConnectionError::Encode(e.to_string()))?;
    write_frame(sink, Frame::Text(welcome), write_wait).await
}

fn log_pump_exit(
    pump: &str,
    context: &ConnectionContext,
    result: Result<Result<(), ConnectionError>, JoinError>,
) {
    match result {
        Ok(Ok(())) => tracing::debug!("{} pump of '{}' finished", pump, context.participant),
        Ok(Err(e)) => tracing::warn!("{} pump of '{}' stopped: {}", pump, context.participant, e),
        Err(e) if e.is_cancelled() => {
            tracing::debug!("{} pump of '{}' cancelled", pump, context.participant)
        }
        Err(e) => tracing::error!("{} pump of '{}' panicked: {}", pump, context.participant, e),
    }
}
