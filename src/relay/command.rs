//! Command tables for both roles.
//!
//! Incoming text is first classified into an input kind, then the pair
//! `(current state, input)` is mapped to exactly one action. The flows decide
//! the next state from the action's outcome.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{service::dialogue::ConversationState, storage::QuestionId};

pub const SHORTCUT_PREFIX: &str = "/answer_";

static BOT_MENTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<command>/[A-Za-z0-9_]+)@[A-Za-z0-9_]+$").unwrap());

/// The `/answer_<id>` token that lets the administrator jump straight to answering.
pub fn shortcut_token(id: QuestionId) -> String {
    format!("{}{}", SHORTCUT_PREFIX, id)
}

/// Drops the `@botname` Telegram appends to commands tapped from a menu.
/// Anything that is not a lone command is returned untouched.
fn strip_bot_mention(text: &str) -> &str {
    BOT_MENTION_REGEX
        .captures(text)
        .and_then(|caps| caps.name("command"))
        .map(|body| body.as_str())
        .unwrap_or(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminInput<'a> {
    Start,
    SeeQuestions,
    SeeAnswers,
    Answer,
    /// Suffix of an `/answer_<id>` token, not yet validated.
    Shortcut(&'a str),
    Text(&'a str),
}

impl<'a> AdminInput<'a> {
    pub fn parse(text: &'a str) -> Self {
        match strip_bot_mention(text) {
            "/start" => Self::Start,
            "/see_questions" => Self::SeeQuestions,
            "/see_answers" => Self::SeeAnswers,
            "/answer" => Self::Answer,
            command => match command.strip_prefix(SHORTCUT_PREFIX) {
                Some(suffix) => Self::Shortcut(suffix),
                None => Self::Text(text),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction<'a> {
    Help,
    ListUnanswered,
    ListAnswered,
    PromptForQuestionId,
    /// Raw id text, from the shortcut suffix or typed after `/answer`.
    SelectQuestion(&'a str),
    SubmitAnswer {
        id: QuestionId,
        body: &'a str,
    },
    Unknown,
}

/// Commands win over state; a shortcut token is honored from any state.
pub fn admin_action(state: ConversationState, input: AdminInput<'_>) -> AdminAction<'_> {
    match (input, state) {
        (AdminInput::Start, _) => AdminAction::Help,
        (AdminInput::SeeQuestions, _) => AdminAction::ListUnanswered,
        (AdminInput::SeeAnswers, _) => AdminAction::ListAnswered,
        (AdminInput::Answer, _) => AdminAction::PromptForQuestionId,
        (AdminInput::Shortcut(raw), _) => AdminAction::SelectQuestion(raw),
        (AdminInput::Text(raw), ConversationState::AwaitingQuestionId) => AdminAction::SelectQuestion(raw),
        (AdminInput::Text(body), ConversationState::AnsweringQuestion(id)) => AdminAction::SubmitAnswer { id, body },
        (AdminInput::Text(_), ConversationState::Idle | ConversationState::AwaitingUserMessage) => {
            AdminAction::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInput<'a> {
    Start,
    Contact,
    SeeQuestions,
    Text(&'a str),
}

impl<'a> UserInput<'a> {
    pub fn parse(text: &'a str) -> Self {
        match strip_bot_mention(text) {
            "/start" => Self::Start,
            "/contact" => Self::Contact,
            "/see_questions" => Self::SeeQuestions,
            _ => Self::Text(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction<'a> {
    Welcome,
    PromptForMessage,
    ListOwnQuestions,
    SubmitQuestion(&'a str),
    Unknown,
}

pub fn user_action(state: ConversationState, input: UserInput<'_>) -> UserAction<'_> {
    match (input, state) {
        (UserInput::Start, _) => UserAction::Welcome,
        (UserInput::Contact, _) => UserAction::PromptForMessage,
        (UserInput::SeeQuestions, _) => UserAction::ListOwnQuestions,
        (UserInput::Text(text), ConversationState::AwaitingUserMessage) => UserAction::SubmitQuestion(text),
        (UserInput::Text(_), _) => UserAction::Unknown,
    }
}
