//! Per-connection pumps and the upgrade entry point.
//!
//! A connection runs two tasks:
//!
//! - the read pump consumes inbound frames under a sliding read deadline and
//!   hands chat messages to the room,
//! - the write pump drains the connection's outbound buffer and pings the
//!   peer on a fixed period.
//!
//! Both are generic over a `Stream`/`Sink` of [`Frame`] so they can run
//! against an axum socket or an in-memory channel.

mod error;
mod frame;
mod pump;

pub use error::ConnectionError;
pub use frame::Frame;
pub use pump::{ConnectionContext, read_pump, serve_connection, write_pump};
