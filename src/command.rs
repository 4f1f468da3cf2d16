use teloxide::{
    adaptors::Throttle,
    payloads::SetMyCommandsSetters,
    prelude::Requester,
    types::{BotCommand, BotCommandScope, ChatId, Recipient},
    Bot,
};

use crate::error::HandlerResult;

pub fn user_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", t!("commands.start")),
        BotCommand::new("contact", t!("commands.contact")),
        BotCommand::new("see_questions", t!("commands.my_questions")),
    ]
}

pub fn admin_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", t!("commands.start")),
        BotCommand::new("see_questions", t!("commands.see_questions")),
        BotCommand::new("see_answers", t!("commands.see_answers")),
        BotCommand::new("answer", t!("commands.answer")),
    ]
}

/// Registers the user menu for everyone and the admin menu for the admin chat only.
pub async fn setup_commands(bot: &Throttle<Bot>, admin_chat_id: ChatId) -> HandlerResult<()> {
    bot.delete_my_commands().await?;
    bot.set_my_commands(user_commands()).await?;
    bot.set_my_commands(admin_commands())
        .scope(BotCommandScope::Chat {
            chat_id: Recipient::Id(admin_chat_id),
        })
        .await?;
    info!("Bot commands registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menus_match_recognized_commands() {
        let user: Vec<_> = user_commands().into_iter().map(|c| c.command).collect();
        assert_eq!(user, vec!["start", "contact", "see_questions"]);

        let admin: Vec<_> = admin_commands().into_iter().map(|c| c.command).collect();
        assert_eq!(admin, vec!["start", "see_questions", "see_answers", "answer"]);
    }
}
