pub mod model;

use async_trait::async_trait;
use std::sync::Arc;
use teloxide::dispatching::dialogue::{InMemStorage, Storage};
use teloxide::types::ChatId;

pub use model::ConversationState;

/// Per-chat conversation state, owned by the relay.
#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    /// Chats that were never seen are `Idle`.
    async fn get(&self, chat_id: ChatId) -> ConversationState;

    async fn set(&self, chat_id: ChatId, state: ConversationState);

    async fn reset(&self, chat_id: ChatId) {
        self.set(chat_id, ConversationState::Idle).await;
    }
}

/// Conversation states kept in teloxide's in-memory dialogue storage.
///
/// Everything is lost on restart and every chat resumes at `Idle`.
#[derive(Clone)]
pub struct DialogueStore {
    storage: Arc<InMemStorage<ConversationState>>,
}

impl DialogueStore {
    pub fn new() -> Self {
        Self {
            storage: InMemStorage::new(),
        }
    }
}

impl Default for DialogueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for DialogueStore {
    async fn get(&self, chat_id: ChatId) -> ConversationState {
        match Arc::clone(&self.storage).get_dialogue(chat_id).await {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read dialogue of {}: {}", chat_id, e);
                ConversationState::Idle
            }
        }
    }

    async fn set(&self, chat_id: ChatId, state: ConversationState) {
        debug!("Conversation {} -> {:?}", chat_id, state);

        // Idle is the implicit default, so it is not stored
        if state == ConversationState::Idle {
            // Removing a chat that holds no dialogue only reports DialogueNotFound
            let _ = Arc::clone(&self.storage).remove_dialogue(chat_id).await;
            return;
        }

        if let Err(e) = Arc::clone(&self.storage).update_dialogue(chat_id, state).await {
            warn!("Failed to store dialogue of {}: {}", chat_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::QuestionId;

    #[tokio::test]
    async fn test_unknown_chat_is_idle() {
        let store = DialogueStore::new();
        assert_eq!(store.get(ChatId(1)).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_set_and_reset() {
        let store = DialogueStore::new();
        store
            .set(ChatId(1), ConversationState::AnsweringQuestion(QuestionId(7)))
            .await;
        store.set(ChatId(2), ConversationState::AwaitingUserMessage).await;

        assert_eq!(
            store.get(ChatId(1)).await,
            ConversationState::AnsweringQuestion(QuestionId(7))
        );
        assert_eq!(store.get(ChatId(2)).await, ConversationState::AwaitingUserMessage);

        store.reset(ChatId(1)).await;
        assert_eq!(store.get(ChatId(1)).await, ConversationState::Idle);
        assert_eq!(store.get(ChatId(2)).await, ConversationState::AwaitingUserMessage);
    }

    #[tokio::test]
    async fn test_reset_of_unknown_chat() {
        let store = DialogueStore::new();
        store.reset(ChatId(3)).await;
        assert_eq!(store.get(ChatId(3)).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_stored_in_dialogue_storage() {
        let store = DialogueStore::new();
        store.set(ChatId(4), ConversationState::AwaitingQuestionId).await;

        let stored = Arc::clone(&store.storage).get_dialogue(ChatId(4)).await.unwrap();
        assert_eq!(stored, Some(ConversationState::AwaitingQuestionId));

        store.reset(ChatId(4)).await;
        let stored = Arc::clone(&store.storage).get_dialogue(ChatId(4)).await.unwrap();
        assert_eq!(stored, None);
    }
}
