//! Multiplayer trivia room coordinator.
//!
//! Players connect over WebSocket, gather in named rooms and play timed
//! trivia games. A small read-only HTTP API exposes the room registry.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod server;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use server::{run, serve};
