use async_trait::async_trait;
use teloxide::{adaptors::Throttle, prelude::Requester, types::ChatId, Bot, RequestError};

/// Telegram rejects text messages longer than this many UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Telegram request failed: {0}")]
    Request(#[from] RequestError),
}

/// Outbound side of the transport.
#[async_trait]
pub trait Messenger: Send + Sync + 'static {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError>;
}

#[async_trait]
impl Messenger for Throttle<Bot> {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError> {
        for chunk in split_text(text, MAX_MESSAGE_LEN) {
            self.send_message(chat_id, chunk).await?;
        }
        Ok(())
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Splits `text` into pieces of at most `limit` UTF-16 code units, preferring line breaks.
pub fn split_text(text: &str, limit: usize) -> Vec<String> {
    if utf16_len(text) <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = utf16_len(line);

        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len += line_len;
            continue;
        }

        // A single line longer than the limit is cut on char boundaries
        for c in line.chars() {
            if current_len + c.len_utf16() > limit && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(c);
            current_len += c.len_utf16();
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
