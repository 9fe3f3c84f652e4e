//! In-process test server and WebSocket client helpers.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    config::HeartbeatConfig,
    domain::Hub,
    infrastructure::repository::InMemoryMessageStore,
    ui::{Server, state::AppState},
};
use hiroba_shared::time::SystemClock;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    time::{Instant, timeout, timeout_at},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const WELCOME: &str = r#"{"sender":"Admin","text":"Welcome!"}"#;

/// Server running on an ephemeral port for the duration of a test
pub struct TestServer {
    pub addr: SocketAddr,
    pub hub: Arc<Hub>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(HeartbeatConfig::default()).await
    }

    pub async fn start_with(config: HeartbeatConfig) -> Self {
        let store = Arc::new(InMemoryMessageStore::new());
        let hub = Arc::new(Hub::new(store.clone()));
        let state = AppState::new(hub.clone(), store, Arc::new(SystemClock), config);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = Server::new(state, hub.clone());
        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            hub,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    pub fn ws_url(&self, room_id: &str, username: &str) -> String {
        format!("ws://{}/ws/{}?username={}", self.addr, room_id, username)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger graceful shutdown and wait for the server task to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        timeout(Duration::from_secs(5), &mut self.handle)
            .await
            .expect("Server did not shut down in time")
            .expect("Server task panicked")
            .expect("Server returned an error");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Connect and consume the welcome frame
pub async fn join(server: &TestServer, room_id: &str, username: &str) -> Client {
    let (mut client, _) = connect_async(server.ws_url(room_id, username))
        .await
        .expect("Failed to connect");
    assert_eq!(next_text(&mut client).await, WELCOME);
    client
}

pub async fn send_text(client: &mut Client, text: &str) {
    let frame = serde_json::json!({ "text": text }).to_string();
    client
        .send(Message::Text(frame.into()))
        .await
        .expect("Failed to send");
}

/// Next text frame, skipping control frames
pub async fn next_text(client: &mut Client) -> String {
    loop {
        let message = timeout(Duration::from_secs(2), client.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Connection ended")
            .expect("WebSocket error");
        match message {
            Message::Text(text) => return text.as_str().to_string(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Unexpected frame: {:?}", other),
        }
    }
}

/// Whether a text frame arrives within `wait`
pub async fn receives_text_within(client: &mut Client, wait: Duration) -> bool {
    let deadline = Instant::now() + wait;
    loop {
        match timeout_at(deadline, client.next()).await {
            Ok(Some(Ok(Message::Text(_)))) => return true,
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
            _ => return false,
        }
    }
}

/// Read until the server closes the connection
pub async fn expect_closed(client: &mut Client) {
    loop {
        let next = timeout(Duration::from_secs(5), client.next())
            .await
            .expect("Timed out waiting for close");
        match next {
            Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
            Some(Ok(_)) => continue,
        }
    }
}

/// Poll `condition` until it holds or two seconds pass
pub async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..40 {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
