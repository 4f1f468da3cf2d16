mod error;
#[cfg(test)]
mod memory;
mod migration;
mod model;
mod turso;

pub use error::StorageError;
#[cfg(test)]
pub use memory::MemoryRepository;
pub use model::{NewQuestion, ParseQuestionIdError, QuestionId, QuestionRecord};
pub use turso::TursoRepository;

use async_trait::async_trait;

/// Durable storage of question records.
///
/// The repository assigns identifiers and is the only writer of records.
/// List operations return records ordered by ascending id.
#[async_trait]
pub trait QuestionRepository: Send + Sync + 'static {
    async fn create(&self, question: NewQuestion) -> Result<QuestionId, StorageError>;

    async fn get_by_id(&self, id: QuestionId) -> Result<Option<QuestionRecord>, StorageError>;

    async fn list_unanswered(&self) -> Result<Vec<QuestionRecord>, StorageError>;

    async fn list_answered(&self) -> Result<Vec<QuestionRecord>, StorageError>;

    async fn list_by_username(&self, username: &str) -> Result<Vec<QuestionRecord>, StorageError>;

    /// Attaches the answer and flips `answered` in one step.
    ///
    /// Fails with [`StorageError::QuestionNotFound`] when the id is unknown or
    /// the question already carries an answer.
    async fn set_answer(&self, id: QuestionId, answer: &str) -> Result<(), StorageError>;
}
