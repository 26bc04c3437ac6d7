//! Core domain models for the trivia coordinator.

use serde::{Deserialize, Serialize};

use super::{
    error::{SessionError, ValueObjectError},
    session::{GameSession, SessionPhase},
    value_object::{PlayerId, PlayerName, QuestionId, RoomName, Timestamp},
};

/// A connected player.
///
/// Created on connect and dropped on disconnect. Rooms only hold copies of
/// this value as membership; the player registry owns the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub connected_at: Timestamp,
}

impl Player {
    pub fn new(id: PlayerId, name: PlayerName, connected_at: Timestamp) -> Self {
        Self {
            id,
            name,
            connected_at,
        }
    }
}

/// A trivia question from the question bank.
///
/// Immutable once loaded; `correct_index` is always a valid index into `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Fails when the id is empty, there are no options, or `correct_index`
    /// does not point at one of the options.
    pub fn new(
        id: String,
        text: String,
        options: Vec<String>,
        correct_index: i64,
    ) -> Result<Self, ValueObjectError> {
        let id = QuestionId::new(id)?;
        if options.is_empty() {
            return Err(ValueObjectError::QuestionWithoutOptions);
        }
        let index = usize::try_from(correct_index)
            .ok()
            .filter(|index| *index < options.len())
            .ok_or(ValueObjectError::CorrectIndexOutOfRange {
                index: correct_index,
                options: options.len(),
            })?;
        Ok(Self {
            id,
            text,
            options,
            correct_index: index,
        })
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Whether `answer_index` picks the correct option. Negative indexes are never correct.
    pub fn is_correct(&self, answer_index: i64) -> bool {
        usize::try_from(answer_index).is_ok_and(|index| index == self.correct_index)
    }
}

/// A named lobby holding a set of players and at most one game session.
#[derive(Debug)]
pub struct Room {
    pub name: RoomName,
    /// Members in join order
    pub members: Vec<Player>,
    pub session: Option<GameSession>,
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new empty room with no session
    pub fn new(name: RoomName, created_at: Timestamp) -> Self {
        Self {
            name,
            members: Vec::new(),
            session: None,
            created_at,
        }
    }

    /// Add a player. Returns `false` if they were already a member.
    pub fn add_member(&mut self, player: Player) -> bool {
        if self.is_member(&player.id) {
            return false;
        }
        self.members.push(player);
        true
    }

    /// Remove a player by id. Returns `true` if they were a member.
    pub fn remove_member(&mut self, player_id: &PlayerId) -> bool {
        let before = self.members.len();
        self.members.retain(|p| &p.id != player_id);
        self.members.len() != before
    }

    pub fn is_member(&self, player_id: &PlayerId) -> bool {
        self.members.iter().any(|p| &p.id == player_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_ids(&self) -> Vec<PlayerId> {
        self.members.iter().map(|p| p.id).collect()
    }

    pub fn member_names(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|p| p.name.as_str().to_string())
            .collect()
    }

    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::NoSession, GameSession::phase)
    }

    /// Enter the countdown phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyRunning` while a countdown or game is in
    /// flight; the running session is left untouched. A finished game may be
    /// replaced by a new one.
    pub fn start_countdown(&mut self) -> Result<(), SessionError> {
        match self.phase() {
            SessionPhase::NoSession | SessionPhase::Complete => {
                self.session = Some(GameSession::countdown());
                Ok(())
            }
            SessionPhase::Countdown | SessionPhase::InProgress => Err(SessionError::AlreadyRunning),
        }
    }

    /// Drop the session, returning the room to `NoSession`.
    pub fn abort_session(&mut self) {
        self.session = None;
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            name: self.name.clone(),
            members: self.members.clone(),
            phase: self.phase(),
            created_at: self.created_at,
        }
    }
}

/// Point-in-time copy of a room, taken under its lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub name: RoomName,
    pub members: Vec<Player>,
    pub phase: SessionPhase,
    pub created_at: Timestamp,
}

impl RoomSnapshot {
    pub fn member_names(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|p| p.name.as_str().to_string())
            .collect()
    }
}
