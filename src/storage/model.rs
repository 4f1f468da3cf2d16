use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use teloxide::types::ChatId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionId(pub i64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid question id: {0:?}")]
pub struct ParseQuestionIdError(pub String);

impl FromStr for QuestionId {
    type Err = ParseQuestionIdError;

    /// Accepts only plain decimal digits, so signs and whitespace are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseQuestionIdError(s.to_string()));
        }

        s.parse::<i64>()
            .map(QuestionId)
            .map_err(|_| ParseQuestionIdError(s.to_string()))
    }
}

/// A question submitted by a user together with its eventual answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub user_id: ChatId,
    pub username: String,
    pub question: String,
    pub answer: String,
    pub answered: bool,
    pub created_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub user_id: ChatId,
    pub username: String,
    pub question: String,
}
