//! 問題バンクの読み込み元

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    domain::{Question, QuestionBankError, QuestionRepository},
    infrastructure::dto::question::QuestionRecord,
};

/// JSON ファイルの問題バンク
///
/// ゲーム開始ごとにファイルを読み直すため、編集内容は再起動なしで
/// 次のゲームから反映される。
pub struct JsonFileQuestionRepository {
    path: PathBuf,
}

impl JsonFileQuestionRepository {
    /// 新しい JsonFileQuestionRepository を作成
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 問題バンクの JSON 文書をパース
    pub fn parse(path: &str, contents: &str) -> Result<Vec<Question>, QuestionBankError> {
        let records: Vec<QuestionRecord> =
            serde_json::from_str(contents).map_err(|e| QuestionBankError::Malformed {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        records.into_iter().map(Question::try_from).collect()
    }
}

#[async_trait]
impl QuestionRepository for JsonFileQuestionRepository {
    async fn load_questions(&self) -> Result<Vec<Question>, QuestionBankError> {
        let path = self.path.display().to_string();
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            QuestionBankError::Unavailable {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        let questions = Self::parse(&path, &contents)?;
        tracing::debug!("Loaded {} questions from '{}'", questions.len(), path);
        Ok(questions)
    }
}

/// 検証済みの固定問題バンク（全ゲームで共有）
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionRepository {
    questions: Vec<Question>,
}

impl InMemoryQuestionRepository {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn load_questions(&self) -> Result<Vec<Question>, QuestionBankError> {
        Ok(self.questions.clone())
    }
}
