//! Room-scoped WebSocket chat hub.
//!
//! Clients connect to `/ws/{room_id}?username=...`; every text message a
//! participant sends is fanned out to all live participants of that room.
//! The hub keeps rooms and connections in memory, evicts slow consumers and
//! detects dead connections with a ping/pong heartbeat.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
