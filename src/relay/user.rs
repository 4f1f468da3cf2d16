use crate::{service::dialogue::ConversationState, storage::NewQuestion};

use super::{
    command::{user_action, UserAction, UserInput},
    render, Inbound, Relay,
};

pub(super) async fn handle(relay: &Relay, inbound: &Inbound) {
    let chat_id = inbound.chat_id;
    let state = relay.conversations.get(chat_id).await;
    let action = user_action(state, UserInput::parse(&inbound.text));
    debug!("User {} action {:?} in state {:?}", chat_id, action, state);

    match action {
        UserAction::Welcome => {
            relay.reply(chat_id, &t!("user.welcome")).await;
        }
        UserAction::PromptForMessage => {
            relay.conversations.set(chat_id, ConversationState::AwaitingUserMessage).await;
            relay.reply(chat_id, &t!("user.prompt_message")).await;
        }
        UserAction::ListOwnQuestions => {
            let text = match relay.questions.list_by_username(&inbound.username).await {
                Ok(records) => render::own_questions(&records),
                Err(e) => {
                    error!("Failed to list questions of {}: {}", chat_id, e);
                    t!("user.listing_failed").to_string()
                }
            };
            relay.reply(chat_id, &text).await;
        }
        UserAction::SubmitQuestion(text) => submit_question(relay, inbound, text).await,
        UserAction::Unknown => {
            relay.reply(chat_id, &t!("user.unknown_command")).await;
        }
    }
}

async fn submit_question(relay: &Relay, inbound: &Inbound, text: &str) {
    let chat_id = inbound.chat_id;

    let question = NewQuestion {
        user_id: chat_id,
        username: inbound.username.clone(),
        question: text.to_string(),
    };

    let id = match relay.questions.create(question).await {
        Ok(id) => id,
        Err(e) => {
            // State stays AwaitingUserMessage so the user can simply resend
            error!("Failed to store question from {}: {}", chat_id, e);
            relay.reply(chat_id, &t!("user.save_failed")).await;
            return;
        }
    };

    info!("Question {} received from {}", id, chat_id);

    let notice = render::new_question_notice(id, &inbound.username, text);
    if !relay.reply(relay.admin_chat_id, &notice).await {
        warn!("Administrator was not notified about question {}", id);
    }

    relay.conversations.reset(chat_id).await;
    relay.reply(chat_id, &t!("user.forwarded")).await;
}
