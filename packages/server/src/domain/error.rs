//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// PlayerId is not a UUID
    #[error("PlayerId must be a valid UUID format (got: {0})")]
    PlayerIdInvalidFormat(String),

    #[error("PlayerName cannot be empty")]
    PlayerNameEmpty,

    #[error("PlayerName cannot exceed {max} characters (got {actual})")]
    PlayerNameTooLong { max: usize, actual: usize },

    #[error("RoomName cannot be empty")]
    RoomNameEmpty,

    #[error("RoomName cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    #[error("QuestionId cannot be empty")]
    QuestionIdEmpty,

    /// A question needs at least one option to be answerable
    #[error("Question must have at least one option")]
    QuestionWithoutOptions,

    #[error("correctIndex {index} is out of range for {options} options")]
    CorrectIndexOutOfRange { index: i64, options: usize },
}

/// Errors raised by the game session state machine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// startGame while a countdown or game is already running
    #[error("A game is already running in this room")]
    AlreadyRunning,

    #[error("No game is in progress in this room")]
    NotInProgress,

    #[error("The game is not counting down")]
    NotCountingDown,

    #[error("No questions are available for this game")]
    NoQuestions,
}

/// Errors returned by the registries
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Room does not exist: {0}")]
    RoomNotFound(String),

    #[error("Room already exists: {0}")]
    RoomAlreadyExists(String),
}

/// Errors raised while loading the question bank
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionBankError {
    #[error("failed to read question bank '{path}': {message}")]
    Unavailable { path: String, message: String },

    #[error("question bank '{path}' is malformed: {message}")]
    Malformed { path: String, message: String },

    #[error("invalid question '{id}': {source}")]
    InvalidQuestion {
        id: String,
        #[source]
        source: ValueObjectError,
    },
}
