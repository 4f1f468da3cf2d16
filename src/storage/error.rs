use libsql::errors::Error as TursoError;

use super::QuestionId;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Turso error: {0}")]
    Turso(#[from] TursoError),
    #[error("Question {0} not found or already answered")]
    QuestionNotFound(QuestionId),
    #[error("Answer must not be empty")]
    EmptyAnswer,
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
    #[error("Migration {version} failed: {reason}")]
    Migration { version: i64, reason: String },
}
