use teloxide::types::ChatId;

use crate::{
    service::dialogue::ConversationState,
    storage::{QuestionId, QuestionRecord},
};

use super::{
    command::{admin_action, AdminAction, AdminInput},
    render, Inbound, Relay, RelayError,
};

pub(super) async fn handle(relay: &Relay, inbound: &Inbound) {
    let chat_id = inbound.chat_id;
    let state = relay.conversations.get(chat_id).await;
    let action = admin_action(state, AdminInput::parse(&inbound.text));
    debug!("Admin action {:?} in state {:?}", action, state);

    match action {
        AdminAction::Help => {
            relay.reply(chat_id, &t!("admin.welcome")).await;
        }
        AdminAction::ListUnanswered => {
            let text = match relay.questions.list_unanswered().await {
                Ok(records) => render::unanswered_list(&records),
                Err(e) => {
                    error!("Failed to list unanswered questions: {}", e);
                    t!("admin.listing_failed").to_string()
                }
            };
            relay.reply(chat_id, &text).await;
        }
        AdminAction::ListAnswered => {
            let text = match relay.questions.list_answered().await {
                Ok(records) => render::answered_list(&records),
                Err(e) => {
                    error!("Failed to list answered questions: {}", e);
                    t!("admin.listing_failed").to_string()
                }
            };
            relay.reply(chat_id, &text).await;
        }
        AdminAction::PromptForQuestionId => {
            relay.conversations.set(chat_id, ConversationState::AwaitingQuestionId).await;
            relay.reply(chat_id, &t!("admin.prompt_question_id")).await;
        }
        AdminAction::SelectQuestion(raw) => select_question(relay, chat_id, raw).await,
        AdminAction::SubmitAnswer { id, body } => submit_answer(relay, chat_id, id, body).await,
        AdminAction::Unknown => {
            relay.reply(chat_id, &t!("admin.unknown_command")).await;
        }
    }
}

async fn find_open_question(relay: &Relay, raw: &str) -> Result<QuestionRecord, RelayError> {
    let id: QuestionId = raw.trim().parse()?;

    match relay.questions.get_by_id(id).await? {
        Some(record) if !record.answered => Ok(record),
        _ => Err(RelayError::NotFound(id)),
    }
}

async fn select_question(relay: &Relay, chat_id: ChatId, raw: &str) {
    match find_open_question(relay, raw).await {
        Ok(record) => {
            info!("Administrator is answering question {}", record.id);
            relay
                .conversations
                .set(chat_id, ConversationState::AnsweringQuestion(record.id))
                .await;
            relay.reply(chat_id, &t!("admin.prompt_answer")).await;
        }
        // Bad id format keeps the current state so the administrator can retry
        Err(e @ RelayError::Parse(_)) => {
            debug!("Rejected question id {:?}: {}", raw, e);
            relay.reply(chat_id, &e.admin_reply()).await;
        }
        // Storage failures keep the state as well
        Err(RelayError::Persistence(e)) => {
            error!("Failed to look up question {:?}: {}", raw, e);
            relay.reply(chat_id, &t!("admin.lookup_failed")).await;
        }
        Err(e) => {
            debug!("Question {:?} is not open: {}", raw, e);
            relay.conversations.reset(chat_id).await;
            relay.reply(chat_id, &t!("admin.question_not_found")).await;
        }
    }
}

async fn answer_question(relay: &Relay, id: QuestionId, body: &str) -> String {
    if let Err(e) = relay.questions.set_answer(id, body).await {
        error!("Failed to store answer for question {}: {}", id, e);
        return RelayError::from(e).admin_reply();
    }

    let record = match relay.questions.get_by_id(id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            error!("Question {} vanished after its answer was stored", id);
            return t!("admin.asker_lookup_failed").to_string();
        }
        Err(e) => {
            error!("Failed to load question {}: {}", id, e);
            return t!("admin.asker_lookup_failed").to_string();
        }
    };

    // The answer stays recorded even if this send fails
    match relay
        .messenger
        .send_text(record.user_id, &render::answer_notice(&record.question, &record.answer))
        .await
    {
        Ok(()) => {
            info!("Answer to question {} delivered to {}", id, record.user_id);
            t!("admin.answer_delivered").to_string()
        }
        Err(e) => {
            error!("Failed to deliver answer to question {}: {}", id, e);
            RelayError::from(e).admin_reply()
        }
    }
}

async fn submit_answer(relay: &Relay, chat_id: ChatId, id: QuestionId, body: &str) {
    if body.trim().is_empty() {
        relay.reply(chat_id, &t!("admin.empty_answer")).await;
        return;
    }

    let reply = answer_question(relay, id, body).await;

    relay.conversations.reset(chat_id).await;
    relay.reply(chat_id, &reply).await;
}
