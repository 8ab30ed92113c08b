use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parkbot::bot::{callback_handler, message_handler, Conversation, TelegramTransport};
use parkbot::config::BotConfig;
use parkbot::dialogue::{ChatState, InMemChatStore};
use parkbot::search::{GroupSearch, SiteSearch};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting park menu bot");

    let config = BotConfig::from_env()?;
    info!(files = ?config.content, "Loaded configuration");

    let bot = Bot::new(config.bot_token.clone());
    let storage = InMemStorage::<ChatState>::new();

    let conversation = Arc::new(Conversation::new(
        Arc::new(TelegramTransport::new(bot.clone())),
        Arc::new(InMemChatStore::with_storage(storage)),
        Arc::new(SiteSearch::new(&config.site_search)?),
        Arc::new(GroupSearch::new(&config.group_search)),
        config.content.clone(),
    ));

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![conversation])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
