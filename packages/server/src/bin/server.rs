//! Multiplayer trivia server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin trivia-rooms-server -- --questions questions.json
//! ```

use clap::Parser;
use trivia_rooms_server::config::ServerArgs;
use trivia_rooms_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = trivia_rooms_server::run(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
