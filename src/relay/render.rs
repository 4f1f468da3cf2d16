use crate::storage::{QuestionId, QuestionRecord};

use super::command::shortcut_token;

const ENTRY_SEPARATOR: &str = "\n\n";

fn display_username(username: &str) -> String {
    if username.is_empty() {
        t!("common.no_username").to_string()
    } else {
        format!("@{}", username)
    }
}

fn join_entries<F>(records: &[QuestionRecord], empty: String, entry: F) -> String
where
    F: Fn(&QuestionRecord) -> String,
{
    if records.is_empty() {
        return empty;
    }

    records.iter().map(entry).collect::<Vec<_>>().join(ENTRY_SEPARATOR)
}

/// Pending questions for the administrator, each with its shortcut token.
pub fn unanswered_list(records: &[QuestionRecord]) -> String {
    join_entries(records, t!("admin.no_new_questions").to_string(), |record| {
        t!(
            "admin.question_entry",
            id = record.id,
            username = display_username(&record.username),
            question = &record.question,
            shortcut = shortcut_token(record.id)
        )
        .to_string()
    })
}

pub fn answered_list(records: &[QuestionRecord]) -> String {
    join_entries(records, t!("admin.no_answered_questions").to_string(), |record| {
        t!(
            "admin.answered_entry",
            id = record.id,
            username = display_username(&record.username),
            question = &record.question,
            answer = &record.answer
        )
        .to_string()
    })
}

/// A user's own questions, including the ones still waiting for an answer.
pub fn own_questions(records: &[QuestionRecord]) -> String {
    join_entries(records, t!("user.no_questions").to_string(), |record| {
        let answer = if record.answered {
            record.answer.clone()
        } else {
            t!("user.awaiting_answer").to_string()
        };
        t!("user.question_entry", question = &record.question, answer = answer).to_string()
    })
}

pub fn new_question_notice(record_id: QuestionId, username: &str, question: &str) -> String {
    t!(
        "admin.new_question",
        username = display_username(username),
        question = question,
        shortcut = shortcut_token(record_id)
    )
    .to_string()
}

pub fn answer_notice(question: &str, answer: &str) -> String {
    t!("user.answer_received", question = question, answer = answer).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use teloxide::types::ChatId;

    use super::*;

    fn record(id: i64, username: &str, question: &str, answer: Option<&str>) -> QuestionRecord {
        QuestionRecord {
            id: QuestionId(id),
            user_id: ChatId(id * 10),
            username: username.to_string(),
            question: question.to_string(),
            answer: answer.unwrap_or_default().to_string(),
            answered: answer.is_some(),
            created_at: Utc::now(),
            answered_at: answer.map(|_| Utc::now()),
        }
    }

    #[test]
    fn test_empty_lists_use_fixed_messages() {
        assert_eq!(unanswered_list(&[]), t!("admin.no_new_questions"));
        assert_eq!(answered_list(&[]), t!("admin.no_answered_questions"));
        assert_eq!(own_questions(&[]), t!("user.no_questions"));
    }

    #[test]
    fn test_unanswered_entries() {
        let text = unanswered_list(&[record(3, "alice", "When?", None), record(5, "", "Where?", None)]);

        assert_eq!(
            text,
            "ID: 3\nUser: @alice\nQuestion: When?\nReply: /answer_3\n\n\
             ID: 5\nUser: (no username)\nQuestion: Where?\nReply: /answer_5"
        );
    }

    #[test]
    fn test_answered_entries() {
        let text = answered_list(&[record(7, "bob", "When?", Some("2pm Tuesday"))]);
        assert_eq!(text, "ID: 7\nUser: @bob\nQuestion: When?\nAnswer: 2pm Tuesday");
    }

    #[test]
    fn test_own_questions_mark_pending_answers() {
        let text = own_questions(&[record(1, "alice", "Q1", Some("A1")), record(2, "alice", "Q2", None)]);
        assert_eq!(text, "Question: Q1\nAnswer: A1\n\nQuestion: Q2\nAnswer: (no answer yet)");
    }

    #[test]
    fn test_notices() {
        assert_eq!(
            new_question_notice(QuestionId(9), "alice", "When is the meeting?"),
            "New question\nFrom: @alice\nMessage: When is the meeting?\nReply: /answer_9"
        );
        assert_eq!(
            answer_notice("When is the meeting?", "2pm Tuesday"),
            "Your question: When is the meeting?\nAdministrator's answer: 2pm Tuesday"
        );
    }
}
