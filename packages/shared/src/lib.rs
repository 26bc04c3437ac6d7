//! Shared utilities for Trivia Rooms.
//!
//! Logging setup and timestamp helpers used by the server binary and its tests.

pub mod logger;
pub mod time;
