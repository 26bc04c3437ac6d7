//! UseCase: ゲーム開始
//!
//! `execute` は検証とルームの `Countdown` への遷移だけを行う。以降の開始処理は
//! 別タスク（ゲーム制御タスク）で実行する：
//!
//! 1. 1 秒ごとに `countdown` を送信（待機中はルームのロックを解放）
//! 2. 問題バンクを読み込み、シャッフルした部分集合を選ぶ
//! 3. セッションを `InProgress` に遷移し、最初の問題を送信
//!
//! カウントダウン中にルームが空になった場合、タスクは何も送信せずに終了する。

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    config::GameSettings,
    domain::{Player, QuestionRepository, RoomName, RoomRepository, SharedRoom, draw_questions},
    infrastructure::{
        Broadcaster,
        dto::websocket::{ClientQuestion, ServerMessage},
    },
};

use super::error::GameError;

/// ゲーム開始のユースケース
pub struct StartGameUseCase {
    rooms: Arc<dyn RoomRepository>,
    questions: Arc<dyn QuestionRepository>,
    broadcaster: Broadcaster,
    settings: GameSettings,
}

impl StartGameUseCase {
    /// 新しい StartGameUseCase を作成
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        questions: Arc<dyn QuestionRepository>,
        broadcaster: Broadcaster,
        settings: GameSettings,
    ) -> Self {
        Self {
            rooms,
            questions,
            broadcaster,
            settings,
        }
    }

    /// ゲーム開始を実行
    ///
    /// # Returns
    ///
    /// ゲーム制御タスクのハンドル（呼び出し側は破棄してよい）
    ///
    /// # Errors
    ///
    /// * `GameError::InvalidQuestionCount` - `num_questions` が 1 未満
    /// * `GameError::RoomNotFound` - ルームが存在しない
    /// * `GameError::NotInRoom` - プレイヤーがルームのメンバーではない
    /// * `GameError::InvalidSessionState` - カウントダウンまたはゲームがすでに進行中
    pub async fn execute(
        &self,
        player: &Player,
        room_name: String,
        num_questions: i64,
    ) -> Result<JoinHandle<()>, GameError> {
        let requested = usize::try_from(num_questions)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(GameError::InvalidQuestionCount(num_questions))?;
        let name = RoomName::new(room_name)?;
        let room = self
            .rooms
            .get_room(&name)
            .await
            .ok_or_else(|| GameError::RoomNotFound(name.as_str().to_string()))?;

        {
            let mut guard = room.lock().await;
            if !guard.is_member(&player.id) {
                return Err(GameError::NotInRoom(name.into_string()));
            }
            guard.start_countdown()?;
        }
        tracing::info!(
            "Player '{}' started a game of {} question(s) in room '{}'",
            player.name,
            requested,
            name
        );

        let controller = GameController {
            room,
            room_name: name,
            questions: self.questions.clone(),
            broadcaster: self.broadcaster.clone(),
            settings: self.settings.clone(),
            requested,
        };
        Ok(tokio::spawn(controller.run()))
    }
}

/// 1 つのルームを `Countdown` から `InProgress` まで進める
struct GameController {
    room: SharedRoom,
    room_name: RoomName,
    questions: Arc<dyn QuestionRepository>,
    broadcaster: Broadcaster,
    settings: GameSettings,
    requested: usize,
}

impl GameController {
    async fn run(self) {
        for tick in (1..=self.settings.countdown_from).rev() {
            let member_ids = {
                let room = self.room.lock().await;
                if room.is_empty() {
                    tracing::info!("Room '{}' emptied during countdown", self.room_name);
                    return;
                }
                room.member_ids()
            };
            self.broadcaster
                .send_many(
                    &member_ids,
                    &ServerMessage::Countdown(format!("Game starts in {tick}...")),
                )
                .await;
            tokio::time::sleep(self.settings.countdown_interval).await;
        }

        let bank = match self.questions.load_questions().await {
            Ok(bank) => bank,
            Err(e) => {
                tracing::error!("Failed to load questions for '{}': {}", self.room_name, e);
                self.abort(format!("Could not load questions: {e}")).await;
                return;
            }
        };
        let drawn = draw_questions(bank, self.requested, &mut rand::rng());

        let mut room = self.room.lock().await;
        if room.is_empty() {
            tracing::info!("Room '{}' emptied before the first question", self.room_name);
            return;
        }
        let Some(session) = room.session.as_mut() else {
            return;
        };
        if let Err(e) = session.begin(drawn) {
            tracing::warn!("Could not begin game in '{}': {}", self.room_name, e);
            drop(room);
            self.abort(e.to_string()).await;
            return;
        }

        let first = session.current_question().map(ClientQuestion::from);
        let count = session.question_count();
        let member_ids = room.member_ids();
        if let Some(first) = first {
            tracing::info!("Room '{}' is in progress with {} question(s)", self.room_name, count);
            self.broadcaster
                .send_many(&member_ids, &ServerMessage::Question(first))
                .await;
        }
    }

    /// ルームを `NoSession` に戻し、理由をメンバーに通知
    async fn abort(&self, reason: String) {
        let member_ids = {
            let mut room = self.room.lock().await;
            room.abort_session();
            room.member_ids()
        };
        self.broadcaster
            .send_many(&member_ids, &ServerMessage::Error(reason))
            .await;
    }
}
