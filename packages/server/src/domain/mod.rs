//! Domain layer for the trivia coordinator.
//!
//! Rooms, players, questions and the per-room game session state machine.
//! Nothing here knows about sockets or JSON envelopes.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{Player, Question, Room, RoomSnapshot};
pub use error::{QuestionBankError, RepositoryError, SessionError, ValueObjectError};
pub use factory::PlayerIdFactory;
pub use repository::{
    Departure, JoinOutcome, OutboundSender, PlayerRepository, QuestionRepository,
    RoomRepository, SharedRoom,
};
#[cfg(test)]
pub use repository::MockQuestionRepository;
pub use session::{AnswerResult, GameSession, Score, SessionPhase, draw_questions};
pub use value_object::{PlayerId, PlayerName, QuestionId, RoomName, Timestamp};
