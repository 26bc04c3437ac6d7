//! UI layer: axum handlers and the state they share.

pub mod handler;
pub mod state;

pub use state::AppState;
