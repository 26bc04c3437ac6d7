//! WebSocket message DTOs for the trivia protocol.
//!
//! Inbound frames are `{"action": ..., ...}` objects; outbound frames are always
//! the `{"type": ..., "data": ...}` envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{Question, RoomSnapshot};

/// Action tags the server understands
pub const KNOWN_ACTIONS: [&str; 5] = ["create", "join", "leave", "startGame", "submitAnswer"];

/// Errors while decoding an inbound frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Not JSON, not an object, or missing/ill-typed fields
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// A decoded player action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientAction {
    Create {
        room_name: String,
    },
    Join {
        room_name: String,
    },
    Leave {
        room_name: String,
    },
    StartGame {
        room_name: String,
        num_questions: i64,
    },
    SubmitAnswer {
        room_name: String,
        #[serde(default)]
        question_id: String,
        #[serde(alias = "answerIndex")]
        answer_idx: i64,
    },
}

impl ClientAction {
    pub fn name(&self) -> &'static str {
        match self {
            ClientAction::Create { .. } => "create",
            ClientAction::Join { .. } => "join",
            ClientAction::Leave { .. } => "leave",
            ClientAction::StartGame { .. } => "startGame",
            ClientAction::SubmitAnswer { .. } => "submitAnswer",
        }
    }
}

#[derive(Deserialize)]
struct ActionTag {
    action: String,
}

/// Decode one inbound frame.
///
/// The `action` tag is checked first so that an unrecognized action is told
/// apart from a frame that is not an action at all.
pub fn decode_action(text: &str) -> Result<ClientAction, ProtocolError> {
    let tag: ActionTag = serde_json::from_str(text)
        .map_err(|e| ProtocolError::MalformedMessage(e.to_string()))?;
    if !KNOWN_ACTIONS.contains(&tag.action.as_str()) {
        return Err(ProtocolError::UnknownAction(tag.action));
    }
    serde_json::from_str(text).map_err(|e| ProtocolError::MalformedMessage(e.to_string()))
}

/// First frame on a new connection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerHello {
    player_name: String,
}

/// Extract the display name from the first frame.
///
/// `{"playerName": "..."}` is preferred; anything else is taken verbatim.
pub fn decode_player_name(text: &str) -> String {
    match serde_json::from_str::<PlayerHello>(text) {
        Ok(hello) if !hello.player_name.is_empty() => hello.player_name,
        _ => text.to_string(),
    }
}

/// Outbound envelope, one variant per message type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    RoomsList(Vec<RoomListEntry>),
    PlayerListUpdate(Vec<String>),
    Created(String),
    Error(String),
    Countdown(String),
    Question(ClientQuestion),
    AnswerFeedback(AnswerFeedback),
    GameOver(GameOverSummary),
}

impl ServerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::RoomsList(_) => "roomsList",
            ServerMessage::PlayerListUpdate(_) => "playerListUpdate",
            ServerMessage::Created(_) => "created",
            ServerMessage::Error(_) => "error",
            ServerMessage::Countdown(_) => "countdown",
            ServerMessage::Question(_) => "question",
            ServerMessage::AnswerFeedback(_) => "answerFeedback",
            ServerMessage::GameOver(_) => "gameOver",
        }
    }
}

/// One row of the `roomsList` envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomListEntry {
    pub room_name: String,
    pub players: Vec<String>,
}

impl From<&RoomSnapshot> for RoomListEntry {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            room_name: snapshot.name.as_str().to_string(),
            players: snapshot.member_names(),
        }
    }
}

/// Client-safe projection of a question: no correct index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuestion {
    pub id: String,
    pub question_text: String,
    pub options: Vec<String>,
}

impl From<&Question> for ClientQuestion {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id().as_str().to_string(),
            question_text: question.text().to_string(),
            options: question.options().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// "<name> got the answer correct!" / "... incorrect!"
    pub message: String,
    pub scores: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub message: String,
    pub scores: BTreeMap<String, i64>,
}
