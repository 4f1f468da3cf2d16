use crate::storage::QuestionId;

/// What kind of input a chat is expected to send next.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    Idle,
    // User
    AwaitingUserMessage,
    // Administrator
    AwaitingQuestionId,
    AnsweringQuestion(QuestionId),
}
