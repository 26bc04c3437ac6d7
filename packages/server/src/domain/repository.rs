//! Repository traits for the player registry, room registry and question bank.
//!
//! The in-memory implementations live in `infrastructure::repository`; use
//! cases only see these traits.
//!
//! ## Lock order
//!
//! room registry map → one room → player registry map. A room lock is never
//! taken while another room lock is held, and nothing takes the room registry
//! lock while holding a room lock.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use super::{
    entity::{Player, Question, Room, RoomSnapshot},
    error::{QuestionBankError, RepositoryError},
    value_object::{PlayerId, RoomName},
};

/// Outbound queue of one connection. A single writer task drains it into the socket.
pub type OutboundSender = UnboundedSender<String>;

/// A room behind its own lock.
pub type SharedRoom = Arc<Mutex<Room>>;

/// A room a player was removed from
#[derive(Debug, Clone)]
pub struct Departure {
    pub room_name: RoomName,
    pub room: SharedRoom,
    /// The room became empty and was removed from the registry
    pub deleted: bool,
}

/// Result of `RoomRepository::join_room`.
///
/// Departures are reported even when the join itself fails, since the player
/// has already been removed from their previous room by then.
#[derive(Debug)]
pub struct JoinOutcome {
    pub departures: Vec<Departure>,
    pub joined: Result<SharedRoom, RepositoryError>,
}

/// Player registry: connected players and how to reach them.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn register(&self, player: Player, sender: OutboundSender);

    /// Returns the removed player, or `None` if it was not registered.
    async fn unregister(&self, player_id: &PlayerId) -> Option<Player>;

    /// Outbound queues for the given players. Unknown ids are skipped.
    async fn senders_for(&self, player_ids: &[PlayerId]) -> Vec<(PlayerId, OutboundSender)>;

    async fn all_senders(&self) -> Vec<(PlayerId, OutboundSender)>;
}

/// Room registry: rooms keyed by unique name.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert an empty room with no session.
    async fn create_room(&self, name: RoomName) -> Result<SharedRoom, RepositoryError>;

    async fn get_room(&self, name: &RoomName) -> Option<SharedRoom>;

    /// Move `player` into `name`, removing them from every other room first.
    async fn join_room(&self, player: &Player, name: &RoomName) -> JoinOutcome;

    /// Remove the player from every room except `except`, deleting rooms left empty.
    async fn leave_all_rooms(&self, player_id: &PlayerId, except: Option<&RoomName>)
    -> Vec<Departure>;

    /// Snapshot of every room, sorted by name.
    async fn list_rooms(&self) -> Vec<RoomSnapshot>;
}

/// Read-only source of trivia questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Load the whole question bank.
    async fn load_questions(&self) -> Result<Vec<Question>, QuestionBankError>;
}
