//! インメモリ実装

pub mod message;

pub use message::{DEFAULT_HISTORY_CAPACITY, InMemoryMessageStore};
