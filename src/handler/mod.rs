use std::sync::Arc;

use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    dptree,
    types::{Message, Update},
};

use crate::{
    error::HandlerResult,
    relay::{Inbound, Relay},
};

pub fn get_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message()
        .branch(dptree::filter_map(Inbound::from_message).endpoint(handle_inbound))
        .branch(dptree::endpoint(handle_non_text))
}

async fn handle_inbound(relay: Arc<Relay>, inbound: Inbound) -> HandlerResult<()> {
    relay.dispatch(&inbound).await;
    Ok(())
}

async fn handle_non_text(relay: Arc<Relay>, msg: Message) -> HandlerResult<()> {
    debug!("Ignoring non-text message {} from {}", msg.id.0, msg.chat.id);
    relay.reject_non_text(msg.chat.id).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use teloxide::types::ChatId;

    use super::*;
    use crate::{
        service::dialogue::ConversationState,
        storage::QuestionRepository,
        utils::test::{photo_update, text_update, TestRelay},
    };

    const ALICE: ChatId = ChatId(42);

    async fn feed(test: &TestRelay, update: Update) {
        let result = get_handler()
            .dispatch(dptree::deps![Arc::clone(&test.relay), update])
            .await;
        assert!(matches!(result, ControlFlow::Break(Ok(()))));
    }

    #[tokio::test]
    async fn test_text_message_reaches_relay() {
        let test = TestRelay::new();

        feed(&test, text_update(42, Some("alice"), "/contact")).await;

        assert_eq!(test.state_of(ALICE).await, ConversationState::AwaitingUserMessage);
        assert_eq!(
            test.messenger.last_to(ALICE).as_deref(),
            Some(&*t!("user.prompt_message"))
        );
    }

    #[tokio::test]
    async fn test_photo_gets_text_only_reply() {
        let test = TestRelay::new();
        feed(&test, text_update(42, Some("alice"), "/contact")).await;

        feed(&test, photo_update(42)).await;

        assert_eq!(test.messenger.last_to(ALICE).as_deref(), Some(&*t!("common.text_only")));
        assert_eq!(test.state_of(ALICE).await, ConversationState::AwaitingUserMessage);
        assert!(test.questions.list_unanswered().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_question_without_username_is_stored_with_empty_name() {
        let test = TestRelay::new();

        feed(&test, text_update(42, None, "/contact")).await;
        feed(&test, text_update(42, None, "Who am I?")).await;

        let records = test.questions.list_unanswered().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].username, "");
        assert_eq!(records[0].question, "Who am I?");
    }
}
