//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    config::GameSettings,
    domain::{PlayerRepository, QuestionRepository, RoomRepository},
    infrastructure::{
        Broadcaster, CleanupReceiver,
        repository::{InMemoryPlayerRepository, InMemoryRoomRepository},
    },
};

/// Shared application state
pub struct AppState {
    /// Player registry (connections and their outbound queues)
    pub players: Arc<dyn PlayerRepository>,
    /// Room registry
    pub rooms: Arc<dyn RoomRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub broadcaster: Broadcaster,
    pub settings: GameSettings,
}

impl AppState {
    /// Build empty registries around the given question bank.
    ///
    /// Also returns the queue of players whose delivery failed; the runner
    /// drains it into disconnect cleanup.
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        settings: GameSettings,
    ) -> (Self, CleanupReceiver) {
        let players: Arc<dyn PlayerRepository> = Arc::new(InMemoryPlayerRepository::new());
        let rooms: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new());
        let (broadcaster, cleanup) = Broadcaster::new(players.clone());
        (
            Self {
                players,
                rooms,
                questions,
                broadcaster,
                settings,
            },
            cleanup,
        )
    }
}
