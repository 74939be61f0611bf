//! Quiz ("test") records and the validated input for authoring one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};

use super::{Error, Timestamp, UserId};

/// Opaque quiz identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizId(String);

impl QuizId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for QuizId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for QuizId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key the correct option index was read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum AnswerKey {
    #[default]
    CorrectIndex,
    CorrectAnswer,
}

/// A multiple-choice question.
///
/// The correct index is accepted as `correctIndex` or `correctAnswer` and
/// written back under the key it arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredQuestion", into = "StoredQuestion")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    answer_key: AnswerKey,
    extra: Map<String, Value>,
}

impl Question {
    pub fn new(question: impl Into<String>, options: Vec<String>, correct_index: usize) -> Self {
        Self {
            question: question.into(),
            options,
            correct_index,
            answer_key: AnswerKey::default(),
            extra: Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredQuestion {
    #[serde(default)]
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_answer: Option<usize>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StoredQuestion> for Question {
    fn from(stored: StoredQuestion) -> Self {
        let (correct_index, answer_key) = match (stored.correct_index, stored.correct_answer) {
            (Some(index), _) => (index, AnswerKey::CorrectIndex),
            (None, Some(index)) => (index, AnswerKey::CorrectAnswer),
            (None, None) => (0, AnswerKey::CorrectIndex),
        };
        Self {
            question: stored.question,
            options: stored.options,
            correct_index,
            answer_key,
            extra: stored.extra,
        }
    }
}

impl From<Question> for StoredQuestion {
    fn from(question: Question) -> Self {
        let index = Some(question.correct_index);
        let (correct_index, correct_answer) = match question.answer_key {
            AnswerKey::CorrectIndex => (index, None),
            AnswerKey::CorrectAnswer => (None, index),
        };
        Self {
            question: question.question,
            options: question.options,
            correct_index,
            correct_answer,
            extra: question.extra,
        }
    }
}

/// Aggregate statistics maintained by clients; stored and returned verbatim.
///
/// Absent figures stay absent and numbers keep their stored representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_count: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondents_count: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_correct: Option<Number>,
}

impl QuizStats {
    /// Stats for a freshly authored quiz.
    fn fresh(questions: usize) -> Self {
        let zero = Some(Number::from(0));
        Self {
            questions_count: Some(Number::from(questions)),
            respondents_count: zero.clone(),
            average_score: zero.clone(),
            average_correct: zero,
        }
    }
}

/// Persisted quiz record, shared by `tests.json` and `userTests.json`.
///
/// Fields outside this model, such as `score` or `takenAt` on seed data, are
/// kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: QuizId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    pub subject: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(flatten)]
    pub stats: QuizStats,
    #[serde(default)]
    pub likes: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validation failure for a quiz draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizValidationError {
    #[error("subject must not be empty")]
    EmptySubject,
    #[error("a quiz needs at least one question")]
    NoQuestions,
    #[error("question {index} must have text")]
    EmptyQuestion { index: usize },
    #[error("question {index} needs at least two options")]
    TooFewOptions { index: usize },
    #[error("question {index} has a correct index outside its options")]
    CorrectIndexOutOfRange { index: usize },
}

impl QuizValidationError {
    pub fn field(&self) -> String {
        match self {
            Self::EmptySubject => "subject".to_owned(),
            Self::NoQuestions => "questions".to_owned(),
            Self::EmptyQuestion { index } => format!("questions[{index}].question"),
            Self::TooFewOptions { index } => format!("questions[{index}].options"),
            Self::CorrectIndexOutOfRange { index } => format!("questions[{index}].correctIndex"),
        }
    }
}

impl From<QuizValidationError> for Error {
    fn from(value: QuizValidationError) -> Self {
        Self::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": "invalid_value" }))
    }
}

/// Validated input for authoring a quiz.
///
/// # Examples
/// ```
/// use quizboard::domain::{Question, QuizDraft};
///
/// let draft = QuizDraft::new(
///     "Capitals",
///     vec![Question::new(
///         "Capital of France?",
///         vec!["Paris".into(), "Lyon".into()],
///         0,
///     )],
/// )
/// .expect("valid draft");
/// assert_eq!(draft.subject(), "Capitals");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    subject: String,
    questions: Vec<Question>,
}

impl QuizDraft {
    pub fn new(subject: &str, questions: Vec<Question>) -> Result<Self, QuizValidationError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(QuizValidationError::EmptySubject);
        }
        if questions.is_empty() {
            return Err(QuizValidationError::NoQuestions);
        }
        for (index, question) in questions.iter().enumerate() {
            if question.question.trim().is_empty() {
                return Err(QuizValidationError::EmptyQuestion { index });
            }
            if question.options.len() < 2 {
                return Err(QuizValidationError::TooFewOptions { index });
            }
            if question.correct_index >= question.options.len() {
                return Err(QuizValidationError::CorrectIndexOutOfRange { index });
            }
        }
        Ok(Self {
            subject: subject.to_owned(),
            questions,
        })
    }

    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Materialise the draft as a quiz owned by `owner` with zeroed stats.
    pub fn into_quiz(self, id: QuizId, owner: UserId, now: DateTime<Utc>) -> Quiz {
        Quiz {
            id,
            owner_id: Some(owner),
            subject: self.subject,
            stats: QuizStats::fresh(self.questions.len()),
            questions: self
                .questions
                .into_iter()
                .map(|q| Question::new(q.question, q.options, q.correct_index))
                .collect(),
            likes: Vec::new(),
            created_at: Some(now.into()),
            extra: Map::new(),
        }
    }
}
