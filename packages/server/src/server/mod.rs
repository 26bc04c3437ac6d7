//! HTTP/WebSocket server: routing, startup and shutdown.

mod error;
mod router;
mod runner;
mod signal;

pub use error::ServerError;
pub use router::build_router;
pub use runner::{run, serve};
pub use signal::shutdown_signal;
