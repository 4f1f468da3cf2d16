mod admin;
pub mod command;
mod error;
mod render;
mod user;

pub use error::RelayError;

use std::sync::Arc;
use teloxide::types::{ChatId, Message};

use crate::{
    service::{dialogue::ConversationStore, messenger::Messenger},
    storage::QuestionRepository,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Administrator,
    User,
}

/// Pure role check against the configured administrator chat.
pub fn classify(sender: ChatId, admin_chat_id: ChatId) -> Role {
    if sender == admin_chat_id {
        Role::Administrator
    } else {
        Role::User
    }
}

/// One text message as seen by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub chat_id: ChatId,
    /// Sender's Telegram username without the leading `@`, empty when unset.
    pub username: String,
    pub text: String,
}

impl Inbound {
    pub fn new(chat_id: ChatId, username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            username: username.into(),
            text: text.into(),
        }
    }

    /// `None` for messages without text (photos, stickers, service messages).
    pub fn from_message(msg: Message) -> Option<Self> {
        let text = msg.text()?.to_string();
        let username = msg
            .from
            .as_ref()
            .and_then(|user| user.username.clone())
            .unwrap_or_default();

        Some(Self::new(msg.chat.id, username, text))
    }
}

/// Routes every inbound message to the administrator or user flow.
///
/// Messages must be fed one at a time; the flows read and write the sender's
/// conversation state without locking across awaits.
pub struct Relay {
    admin_chat_id: ChatId,
    questions: Arc<dyn QuestionRepository>,
    conversations: Arc<dyn ConversationStore>,
    messenger: Arc<dyn Messenger>,
}

impl Relay {
    pub fn new(
        admin_chat_id: ChatId,
        questions: Arc<dyn QuestionRepository>,
        conversations: Arc<dyn ConversationStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            admin_chat_id,
            questions,
            conversations,
            messenger,
        }
    }

    pub fn role_of(&self, chat_id: ChatId) -> Role {
        classify(chat_id, self.admin_chat_id)
    }

    pub async fn dispatch(&self, inbound: &Inbound) {
        match self.role_of(inbound.chat_id) {
            Role::Administrator => admin::handle(self, inbound).await,
            Role::User => user::handle(self, inbound).await,
        }
    }

    /// Non-text messages get a fixed reply and leave the conversation untouched.
    pub async fn reject_non_text(&self, chat_id: ChatId) {
        self.reply(chat_id, &t!("common.text_only")).await;
    }

    /// Best-effort send; failures are logged and reported back as `false`.
    async fn reply(&self, chat_id: ChatId, text: &str) -> bool {
        match self.messenger.send_text(chat_id, text).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send message to {}: {}", chat_id, e);
                false
            }
        }
    }
}
