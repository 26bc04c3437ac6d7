//! Per-room game session state machine.
//!
//! ```text
//! NoSession ──start──▶ Countdown ──begin──▶ InProgress ──last correct answer──▶ Complete
//! ```
//!
//! `NoSession` is represented by a room without a session. The session itself
//! is plain data; the room lock serializes every transition.

use rand::{Rng, seq::SliceRandom};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::{
    entity::{Player, Question},
    error::SessionError,
    value_object::{PlayerId, PlayerName},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    NoSession,
    Countdown,
    InProgress,
    Complete,
}

/// Score entry for one player.
///
/// The name is kept so players who left mid-game still show up in the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub player_name: PlayerName,
    pub points: i64,
}

/// What a single answer did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerResult {
    pub correct: bool,
    /// Points awarded (negative on a wrong answer)
    pub delta: i64,
    /// The player's total after this answer
    pub total: i64,
    /// True when this answer moved the session to `Complete`
    pub finished: bool,
}

#[derive(Debug)]
pub struct GameSession {
    phase: SessionPhase,
    questions: Vec<Question>,
    current_index: usize,
    scores: HashMap<PlayerId, Score>,
}

impl GameSession {
    /// A session waiting for its countdown to finish.
    pub fn countdown() -> Self {
        Self {
            phase: SessionPhase::Countdown,
            questions: Vec::new(),
            current_index: 0,
            scores: HashMap::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The question answers are currently scored against.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SessionPhase::InProgress => self.questions.get(self.current_index),
            _ => None,
        }
    }

    /// Leave the countdown with the drawn questions.
    ///
    /// # Errors
    ///
    /// `NotCountingDown` outside the countdown, `NoQuestions` when the draw is empty.
    pub fn begin(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Countdown {
            return Err(SessionError::NotCountingDown);
        }
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        self.questions = questions;
        self.current_index = 0;
        self.scores.clear();
        self.phase = SessionPhase::InProgress;
        Ok(())
    }

    /// Score one answer against the current question.
    ///
    /// A correct answer adds `points` and advances to the next question; a
    /// wrong one subtracts `points` and leaves the question in place. The
    /// session completes when the index reaches the question count.
    ///
    /// # Errors
    ///
    /// `NotInProgress` unless the session is `InProgress`.
    pub fn submit_answer(
        &mut self,
        player: &Player,
        answer_index: i64,
        points: i64,
    ) -> Result<AnswerResult, SessionError> {
        let correct = self
            .current_question()
            .ok_or(SessionError::NotInProgress)?
            .is_correct(answer_index);
        let delta = if correct { points } else { -points };

        let score = self.scores.entry(player.id).or_insert_with(|| Score {
            player_name: player.name.clone(),
            points: 0,
        });
        score.points += delta;
        let total = score.points;

        if correct {
            self.current_index += 1;
        }
        let finished = self.current_index >= self.questions.len();
        if finished {
            self.phase = SessionPhase::Complete;
        }

        Ok(AnswerResult {
            correct,
            delta,
            total,
            finished,
        })
    }

    pub fn score_of(&self, player_id: &PlayerId) -> Option<i64> {
        self.scores.get(player_id).map(|score| score.points)
    }

    /// Scores keyed by display name, for the wire.
    ///
    /// Players sharing a display name are summed into one entry.
    pub fn scores_by_name(&self) -> BTreeMap<String, i64> {
        let mut by_name = BTreeMap::new();
        for score in self.scores.values() {
            *by_name
                .entry(score.player_name.as_str().to_string())
                .or_insert(0) += score.points;
        }
        by_name
    }
}

/// Shuffle the bank uniformly and keep at most `requested` questions.
pub fn draw_questions<R: Rng + ?Sized>(
    mut bank: Vec<Question>,
    requested: usize,
    rng: &mut R,
) -> Vec<Question> {
    bank.shuffle(rng);
    bank.truncate(requested);
    bank
}
