//! UseCase: 回答送信
//!
//! 回答は常にルームの現在の問題に対して採点する。読み取りから更新、その結果の
//! ブロードキャストまでをルームのロック内で行うため、同じルームへの同時回答は
//! 1 件ずつ適用される。

use std::sync::Arc;

use crate::{
    domain::{AnswerResult, Player, RoomName, RoomRepository, SessionError},
    infrastructure::{
        Broadcaster,
        dto::websocket::{AnswerFeedback, ClientQuestion, GameOverSummary, ServerMessage},
    },
};

use super::error::GameError;

pub const GAME_OVER_MESSAGE: &str = "Game over! Thanks for playing.";

/// 回答送信のユースケース
pub struct SubmitAnswerUseCase {
    rooms: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
    points_per_answer: i64,
}

impl SubmitAnswerUseCase {
    /// 新しい SubmitAnswerUseCase を作成
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        broadcaster: Broadcaster,
        points_per_answer: i64,
    ) -> Self {
        Self {
            rooms,
            broadcaster,
            points_per_answer,
        }
    }

    /// 回答を採点し、結果をルームにブロードキャスト
    ///
    /// 最後の問題なら `gameOver` を、それ以外なら `answerFeedback` と
    /// 現在の問題（変わらない場合もある）を送信する。
    ///
    /// # Errors
    ///
    /// * `GameError::RoomNotFound` - ルームが存在しない
    /// * `GameError::NotInRoom` - プレイヤーがルームのメンバーではない
    /// * `GameError::InvalidSessionState` - ゲームが進行中ではない
    pub async fn execute(
        &self,
        player: &Player,
        room_name: String,
        question_id: String,
        answer_idx: i64,
    ) -> Result<AnswerResult, GameError> {
        let name = RoomName::new(room_name)?;
        let room = self
            .rooms
            .get_room(&name)
            .await
            .ok_or_else(|| GameError::RoomNotFound(name.as_str().to_string()))?;

        let mut room = room.lock().await;
        if !room.is_member(&player.id) {
            return Err(GameError::NotInRoom(name.into_string()));
        }
        let member_ids = room.member_ids();
        let session = room.session.as_mut().ok_or(SessionError::NotInProgress)?;

        if let Some(current) = session.current_question()
            && current.id().as_str() != question_id
        {
            tracing::debug!(
                "Player '{}' answered '{}' but the current question is '{}'",
                player.name,
                question_id,
                current.id()
            );
        }

        let result = session.submit_answer(player, answer_idx, self.points_per_answer)?;
        let scores = session.scores_by_name();
        tracing::debug!(
            "Player '{}' answered {} in '{}' ({:+}, total {})",
            player.name,
            answer_idx,
            name,
            result.delta,
            result.total
        );

        if result.finished {
            tracing::info!("Game over in room '{}'", name);
            self.broadcaster
                .send_many(
                    &member_ids,
                    &ServerMessage::GameOver(GameOverSummary {
                        message: GAME_OVER_MESSAGE.to_string(),
                        scores,
                    }),
                )
                .await;
            return Ok(result);
        }

        let verdict = if result.correct { "correct" } else { "incorrect" };
        self.broadcaster
            .send_many(
                &member_ids,
                &ServerMessage::AnswerFeedback(AnswerFeedback {
                    correct: result.correct,
                    message: format!("{} got the answer {verdict}!", player.name),
                    scores,
                }),
            )
            .await;
        if let Some(next) = session.current_question() {
            self.broadcaster
                .send_many(&member_ids, &ServerMessage::Question(ClientQuestion::from(next)))
                .await;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::SessionPhase,
        usecase::test_support::{Harness, drain, question, start_session, types},
    };

    fn usecase(harness: &Harness) -> SubmitAnswerUseCase {
        SubmitAnswerUseCase::new(harness.rooms(), harness.broadcaster.clone(), 10)
    }

    #[tokio::test]
    async fn test_correct_answer_scores_and_advances() {
        // テスト項目: 正解すると +10 点で次の問題に進む
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut rx_alice) = harness.connect("alice").await;
        let (bob, mut rx_bob) = harness.connect("bob").await;
        let room = harness.room_with("trivia", &[&alice, &bob]).await;
        start_session(&room, vec![question("q1", 2), question("q2", 1)]).await;

        // when (操作):
        let result = usecase(&harness)
            .execute(&alice, "trivia".to_string(), "q1".to_string(), 2)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(result.correct);
        assert_eq!(result.total, 10);
        assert!(!result.finished);
        for rx in [&mut rx_alice, &mut rx_bob] {
            let messages = drain(rx);
            assert_eq!(types(&messages), vec!["answerFeedback", "question"]);
            assert_eq!(messages[0]["data"]["correct"], true);
            assert_eq!(
                messages[0]["data"]["message"],
                "alice got the answer correct!"
            );
            assert_eq!(messages[0]["data"]["scores"], serde_json::json!({"alice": 10}));
            assert_eq!(messages[1]["data"]["id"], "q2");
        }
        assert_eq!(room.lock().await.session.as_ref().unwrap().current_index(), 1);
    }

    #[tokio::test]
    async fn test_wrong_answer_loses_points_and_stays() {
        // テスト項目: 不正解だと -10 点で同じ問題のまま
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut rx_alice) = harness.connect("alice").await;
        let room = harness.room_with("trivia", &[&alice]).await;
        start_session(&room, vec![question("q1", 2), question("q2", 1)]).await;

        // when (操作):
        let result = usecase(&harness)
            .execute(&alice, "trivia".to_string(), "q1".to_string(), 0)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(!result.correct);
        assert_eq!(result.total, -10);
        let messages = drain(&mut rx_alice);
        assert_eq!(types(&messages), vec!["answerFeedback", "question"]);
        assert_eq!(
            messages[0]["data"]["message"],
            "alice got the answer incorrect!"
        );
        assert_eq!(messages[0]["data"]["scores"], serde_json::json!({"alice": -10}));
        assert_eq!(messages[1]["data"]["id"], "q1");
        assert_eq!(room.lock().await.session.as_ref().unwrap().current_index(), 0);
    }

    #[tokio::test]
    async fn test_single_question_game_ends_after_correct_answer() {
        // テスト項目: 1 問のゲームは正解で gameOver になる
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut rx_alice) = harness.connect("alice").await;
        let room = harness.room_with("trivia", &[&alice]).await;
        start_session(&room, vec![question("q1", 3)]).await;

        // when (操作):
        let result = usecase(&harness)
            .execute(&alice, "trivia".to_string(), "q1".to_string(), 3)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(result.finished);
        let messages = drain(&mut rx_alice);
        assert_eq!(types(&messages), vec!["gameOver"]);
        assert_eq!(messages[0]["data"]["message"], GAME_OVER_MESSAGE);
        assert_eq!(messages[0]["data"]["scores"], serde_json::json!({"alice": 10}));
        assert_eq!(room.lock().await.phase(), SessionPhase::Complete);
    }

    #[tokio::test]
    async fn test_answer_ignores_mismatched_question_id() {
        // テスト項目: questionId が違っても現在の問題で採点される
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _rx_alice) = harness.connect("alice").await;
        let room = harness.room_with("trivia", &[&alice]).await;
        start_session(&room, vec![question("q1", 1), question("q2", 0)]).await;

        // when (操作):
        let result = usecase(&harness)
            .execute(&alice, "trivia".to_string(), "q2".to_string(), 1)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(result.correct);
    }

    #[tokio::test]
    async fn test_answer_without_game_is_rejected() {
        // テスト項目: ゲームが進行していないルームへの回答はエラー
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut rx_alice) = harness.connect("alice").await;
        harness.room_with("trivia", &[&alice]).await;

        // when (操作):
        let result = usecase(&harness)
            .execute(&alice, "trivia".to_string(), "q1".to_string(), 0)
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(GameError::InvalidSessionState(SessionError::NotInProgress))
        );
        assert!(drain(&mut rx_alice).is_empty());
    }

    #[tokio::test]
    async fn test_answer_after_game_over_is_rejected() {
        // テスト項目: 終了したゲームへの回答はエラー
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _rx_alice) = harness.connect("alice").await;
        let room = harness.room_with("trivia", &[&alice]).await;
        start_session(&room, vec![question("q1", 0)]).await;
        let usecase = usecase(&harness);
        usecase
            .execute(&alice, "trivia".to_string(), "q1".to_string(), 0)
            .await
            .unwrap();

        // when (操作):
        let result = usecase
            .execute(&alice, "trivia".to_string(), "q1".to_string(), 0)
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(GameError::InvalidSessionState(SessionError::NotInProgress))
        );
    }

    #[tokio::test]
    async fn test_answer_requires_membership() {
        // テスト項目: メンバーでないプレイヤーの回答は拒否される
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _rx_alice) = harness.connect("alice").await;
        let (mallory, _rx_mallory) = harness.connect("mallory").await;
        let room = harness.room_with("trivia", &[&alice]).await;
        start_session(&room, vec![question("q1", 0)]).await;

        // when (操作):
        let result = usecase(&harness)
            .execute(&mallory, "trivia".to_string(), "q1".to_string(), 0)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(GameError::NotInRoom("trivia".to_string())));
        assert_eq!(room.lock().await.phase(), SessionPhase::InProgress);
    }

    #[tokio::test]
    async fn test_answer_missing_room() {
        // テスト項目: 存在しないルームへの回答はエラー
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _rx_alice) = harness.connect("alice").await;

        // when (操作):
        let result = usecase(&harness)
            .execute(&alice, "nope".to_string(), "q1".to_string(), 0)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(GameError::RoomNotFound("nope".to_string())));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_correct_answers_advance_once_each() {
        // テスト項目: 同時に正解しても 1 回の正解につき 1 問しか進まない
        // given (前提条件):
        let harness = Harness::new();
        let mut players = Vec::new();
        let mut receivers = Vec::new();
        for i in 0..8 {
            let (player, rx) = harness.connect(&format!("player{i}")).await;
            players.push(player);
            receivers.push(rx);
        }
        let refs: Vec<&Player> = players.iter().collect();
        let room = harness.room_with("trivia", &refs).await;
        start_session(
            &room,
            vec![question("q1", 0), question("q2", 0), question("q3", 0)],
        )
        .await;
        let usecase = Arc::new(usecase(&harness));

        // when (操作): 全員が正解を同時に送信する
        let mut handles = Vec::new();
        for player in players.clone() {
            let usecase = usecase.clone();
            handles.push(tokio::spawn(async move {
                usecase
                    .execute(&player, "trivia".to_string(), String::new(), 0)
                    .await
            }));
        }
        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        // then (期待する結果): 3 人だけが採点され、残りはゲーム終了後のエラー
        let scored: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(scored.len(), 3);
        assert!(scored.iter().all(|r| r.correct));
        assert_eq!(scored.iter().filter(|r| r.finished).count(), 1);
        let room = room.lock().await;
        let session = room.session.as_ref().unwrap();
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.current_index(), 3);
        assert_eq!(session.scores_by_name().values().sum::<i64>(), 30);
    }
}
