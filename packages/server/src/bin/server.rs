//! Room-scoped WebSocket chat server.
//!
//! Clients join a room by connecting to `/ws/{room_id}?username={name}`;
//! every message is broadcast to all participants of that room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --pong-wait-secs 30
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hiroba_server::{
    config::{
        DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_OUTBOUND_CAPACITY, DEFAULT_PONG_WAIT,
        DEFAULT_WRITE_WAIT, HeartbeatConfig,
    },
    domain::Hub,
    infrastructure::repository::{DEFAULT_HISTORY_CAPACITY, InMemoryMessageStore},
    ui::{Server, state::AppState},
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

/// Upper bound for the timing flags: one day
const MAX_WAIT_SECS: u64 = 86_400;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Room-scoped WebSocket chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds a connection may stay silent before it is dropped (1 to 86400)
    #[arg(
        long,
        default_value_t = DEFAULT_PONG_WAIT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..=MAX_WAIT_SECS)
    )]
    pong_wait_secs: u64,

    /// Seconds a single write to a client may take (1 to 86400)
    #[arg(
        long,
        default_value_t = DEFAULT_WRITE_WAIT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..=MAX_WAIT_SECS)
    )]
    write_wait_secs: u64,

    /// Maximum inbound message size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,

    /// Outbound frames buffered per connection before it is evicted
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    outbound_capacity: usize,

    /// Messages kept per room for the history endpoint
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. MessageStore
    // 2. Hub
    // 3. UseCases (AppState)
    // 4. Server

    // 1. Create MessageStore (in-memory history)
    let store = Arc::new(InMemoryMessageStore::with_capacity(args.history_capacity));

    // 2. Create Hub
    let hub = Arc::new(Hub::new(store.clone()));

    // 3. Create UseCases
    let heartbeat = HeartbeatConfig::new(
        Duration::from_secs(args.pong_wait_secs),
        Duration::from_secs(args.write_wait_secs),
    )
    .with_max_message_size(args.max_message_size)
    .with_outbound_capacity(args.outbound_capacity);
    tracing::info!("Connection settings: {:?}", heartbeat);
    let state = AppState::new(hub.clone(), store, Arc::new(SystemClock), heartbeat);

    // 4. Create and run the server
    let server = Server::new(state, hub);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
