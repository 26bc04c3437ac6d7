//! Command-line and environment configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// Multiplayer trivia server
#[derive(Debug, Clone, Parser)]
#[command(name = "trivia-rooms-server", version, about)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Question bank (JSON array of questions)
    #[arg(short, long, env = "QUESTIONS_PATH", default_value = "questions.json")]
    pub questions: PathBuf,

    /// First countdown tick before a game starts
    #[arg(long, default_value_t = 3)]
    pub countdown_from: u32,

    /// Delay between countdown ticks, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub countdown_interval_ms: u64,

    /// Points added for a correct answer and removed for a wrong one
    #[arg(long, default_value_t = 10)]
    pub points_per_answer: i64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerArgs {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            countdown_from: self.countdown_from,
            countdown_interval: Duration::from_millis(self.countdown_interval_ms),
            points_per_answer: self.points_per_answer,
        }
    }
}

/// Tunables of the game flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub countdown_from: u32,
    pub countdown_interval: Duration,
    pub points_per_answer: i64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            countdown_from: 3,
            countdown_interval: Duration::from_secs(1),
            points_per_answer: 10,
        }
    }
}
