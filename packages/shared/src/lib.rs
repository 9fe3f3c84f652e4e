//! Utilities shared by the Hiroba packages: logging setup and clock helpers.

pub mod logger;
pub mod time;
