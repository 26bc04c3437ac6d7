//! On-disk question bank format.
//!
//! ```json
//! [{"id": "q1", "questionText": "...", "options": ["a", "b"], "correctIndex": 1}]
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{Question, QuestionBankError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_index: i64,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionBankError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let id = record.id.clone();
        Question::new(
            record.id,
            record.question_text,
            record.options,
            record.correct_index,
        )
        .map_err(|source| QuestionBankError::InvalidQuestion { id, source })
    }
}
