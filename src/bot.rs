use std::{sync::Arc, time::Duration};

use teloxide::adaptors::throttle::Limits;
use teloxide::adaptors::Throttle;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::Bot;

use crate::config::AppConfig;
use crate::error::{BotResult, HandlerResult};
use crate::handler::get_handler;
use crate::relay::Relay;
use crate::service::dialogue::DialogueStore;
use crate::storage::TursoRepository;

pub struct BotService {
    pub bot: Throttle<Bot>,
    relay: Arc<Relay>,
    admin_chat_id: ChatId,
}

impl BotService {
    pub async fn new(config: &AppConfig) -> BotResult<Self> {
        info!("Initializing question repository...");
        let questions = Arc::new(TursoRepository::open(&config.storage).await?);

        let client = teloxide::net::default_reqwest_settings()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        let bot = Bot::with_client(config.telegram.0.clone(), client).throttle(Limits::default());

        let relay = Arc::new(Relay::new(
            config.admin.chat_id,
            questions,
            Arc::new(DialogueStore::new()),
            Arc::new(bot.clone()),
        ));

        Ok(Self {
            bot,
            relay,
            admin_chat_id: config.admin.chat_id,
        })
    }

    pub async fn start(&self) -> HandlerResult<()> {
        info!("Testing connection to Telegram API...");
        match self.bot.get_me().await {
            Ok(me) => info!("Successfully connected to Telegram API as @{}", me.username()),
            Err(e) => {
                error!("Failed to connect to Telegram API: {:?}", e);
                return Err(anyhow::anyhow!("Failed to connect to Telegram API: {}", e).into());
            }
        }

        if let Err(e) = crate::command::setup_commands(&self.bot, self.admin_chat_id).await {
            warn!("Failed to register bot commands: {:?}", e);
        }

        let handler = get_handler();

        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![Arc::clone(&self.relay)])
            // A single distribution key keeps every update on one worker, in arrival order
            .distribution_function(|_| Some(()))
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
