//! UseCase 層のエラー定義
//!
//! 各バリアントの `Display` 文字列が、操作したプレイヤーに `error` メッセージ
//! として送られる。

use thiserror::Error;

use crate::domain::{RepositoryError, SessionError, ValueObjectError};

/// ユースケース実行時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Room does not exist: {0}")]
    RoomNotFound(String),

    #[error("Room already exists: {0}")]
    RoomAlreadyExists(String),

    /// セッションのフェーズが操作を許可しない
    #[error("{0}")]
    InvalidSessionState(#[from] SessionError),

    #[error("You are not in room: {0}")]
    NotInRoom(String),

    #[error("numQuestions must be at least 1 (got {0})")]
    InvalidQuestionCount(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),
}

impl From<RepositoryError> for GameError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(name) => GameError::RoomNotFound(name),
            RepositoryError::RoomAlreadyExists(name) => GameError::RoomAlreadyExists(name),
        }
    }
}
