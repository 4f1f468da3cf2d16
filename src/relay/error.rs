use crate::{
    service::messenger::DeliveryError,
    storage::{ParseQuestionIdError, QuestionId, StorageError},
};

/// Failures inside a flow. Each one ends up as a plain-text reply to the actor.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseQuestionIdError),
    #[error("Question {0} not found or already answered")]
    NotFound(QuestionId),
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StorageError),
    #[error("Delivery failure: {0}")]
    Delivery(#[from] DeliveryError),
}

impl RelayError {
    /// Reply shown to the administrator while selecting or answering a question.
    pub fn admin_reply(&self) -> String {
        match self {
            RelayError::Parse(_) => t!("admin.invalid_question_id").to_string(),
            RelayError::NotFound(_) | RelayError::Persistence(StorageError::QuestionNotFound(_)) => {
                t!("admin.question_not_found").to_string()
            }
            RelayError::Persistence(StorageError::EmptyAnswer) => t!("admin.empty_answer").to_string(),
            RelayError::Persistence(_) => t!("admin.answer_save_failed").to_string(),
            RelayError::Delivery(_) => t!("admin.delivery_failed").to_string(),
        }
    }
}
