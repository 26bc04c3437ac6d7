//! WebSocket connection handlers.
//!
//! Each connection gets two tasks: a reader that decodes actions and runs
//! the matching use case, and a writer that is the only task touching the
//! socket's sending half. Everything else reaches the player through the
//! outbound queue.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{Player, PlayerName},
    infrastructure::dto::websocket::{
        ClientAction, ProtocolError, ServerMessage, decode_action, decode_player_name,
    },
    ui::state::AppState,
    usecase::{
        ConnectPlayerUseCase, CreateRoomUseCase, DisconnectPlayerUseCase, GameError,
        JoinRoomUseCase, LeaveRoomUseCase, StartGameUseCase, SubmitAnswerUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // The first frame carries the display name
    let Some(raw_name) = read_player_name(&mut receiver).await else {
        tracing::debug!("Connection closed before a player name was sent");
        return;
    };
    let name = match PlayerName::try_from(raw_name) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            if let Ok(json) = serde_json::to_string(&ServerMessage::Error(e.to_string())) {
                let _ = sender.send(Message::Text(json.into())).await;
            }
            let _ = sender.close().await;
            return;
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let player = ConnectPlayerUseCase::new(
        state.players.clone(),
        state.rooms.clone(),
        state.broadcaster.clone(),
    )
    .execute(name, tx)
    .await;
    let player_id = player.id;

    // Spawn a task to receive actions from this player
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", player.name, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => dispatch(&state_clone, &player, text.as_str()).await,
                Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                    Ok(text) => dispatch(&state_clone, &player, text).await,
                    Err(e) => tracing::warn!(
                        "Dropping malformed message from '{}': binary frame is not UTF-8 ({})",
                        player.name,
                        e
                    ),
                },
                Message::Close(_) => {
                    tracing::info!("Player '{}' requested close", player.name);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task that drains the outbound queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    DisconnectPlayerUseCase::new(
        state.players.clone(),
        state.rooms.clone(),
        state.broadcaster.clone(),
    )
    .execute(&player_id)
    .await;
}

/// Wait for the first data frame and extract the player name from it.
async fn read_player_name(receiver: &mut SplitStream<WebSocket>) -> Option<String> {
    while let Some(msg) = receiver.next().await {
        match msg.ok()? {
            Message::Text(text) => return Some(decode_player_name(text.as_str())),
            Message::Binary(bytes) => {
                return Some(decode_player_name(&String::from_utf8_lossy(&bytes)));
            }
            Message::Close(_) => return None,
            _ => {}
        }
    }
    None
}

/// Decode one inbound frame and run the matching use case.
async fn dispatch(state: &AppState, player: &Player, text: &str) {
    let action = match decode_action(text) {
        Ok(action) => action,
        Err(ProtocolError::MalformedMessage(reason)) => {
            tracing::warn!("Dropping malformed message from '{}': {}", player.name, reason);
            return;
        }
        Err(e @ ProtocolError::UnknownAction(_)) => {
            tracing::warn!("Player '{}': {}", player.name, e);
            state
                .broadcaster
                .send(&player.id, &ServerMessage::Error(e.to_string()))
                .await;
            return;
        }
    };
    tracing::debug!("Player '{}' sent {}", player.name, action.name());

    let result: Result<(), GameError> = match action {
        ClientAction::Create { room_name } => {
            CreateRoomUseCase::new(state.rooms.clone(), state.broadcaster.clone())
                .execute(player, room_name)
                .await
        }
        ClientAction::Join { room_name } => {
            JoinRoomUseCase::new(state.rooms.clone(), state.broadcaster.clone())
                .execute(player, room_name)
                .await
        }
        ClientAction::Leave { room_name } => {
            LeaveRoomUseCase::new(state.rooms.clone(), state.broadcaster.clone())
                .execute(player, &room_name)
                .await;
            Ok(())
        }
        ClientAction::StartGame {
            room_name,
            num_questions,
        } => StartGameUseCase::new(
            state.rooms.clone(),
            state.questions.clone(),
            state.broadcaster.clone(),
            state.settings.clone(),
        )
        .execute(player, room_name, num_questions)
        .await
        .map(|_| ()),
        ClientAction::SubmitAnswer {
            room_name,
            question_id,
            answer_idx,
        } => SubmitAnswerUseCase::new(
            state.rooms.clone(),
            state.broadcaster.clone(),
            state.settings.points_per_answer,
        )
        .execute(player, room_name, question_id, answer_idx)
        .await
        .map(|_| ()),
    };

    if let Err(e) = result {
        tracing::info!("Player '{}' action rejected: {}", player.name, e);
        state
            .broadcaster
            .send(&player.id, &ServerMessage::Error(e.to_string()))
            .await;
    }
}
