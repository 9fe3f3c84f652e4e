//! WebSocket chat server implementation.

pub mod connection;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
