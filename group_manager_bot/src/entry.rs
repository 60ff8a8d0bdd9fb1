use std::sync::Arc;

use bot_commons::{commands::generate_bot_commands, config::bot_token};
use teloxide::{dptree::deps, prelude::*};

use crate::{
    config::Settings,
    handlers::{self, commands::COMMANDS},
    warnings::WarningStore,
};

/// # Panics
///
/// Panics if the bot token or the settings in the environment are bad,
/// or if the data file can't be loaded.
pub async fn entry() {
    log::info!("ASYNC WOOOO");
    let token = bot_token().expect("Could not get the bot token!");
    let settings = Settings::from_env().expect("Bad settings!");

    log::info!(
        "Kicking after {} warnings, link filter is {}.",
        settings.max_warns,
        if settings.anti_links { "on" } else { "off" }
    );

    let bot = Bot::new(token);

    bot.set_my_commands(generate_bot_commands(COMMANDS))
        .await
        .expect("Failed to set bot commands!");

    let store = Arc::new(
        WarningStore::open(settings.data_path.clone(), settings.max_warns)
            .await
            .expect("Failed to load the warnings!"),
    );
    let settings = Arc::new(settings);

    log::info!("Creating the handler...");

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    log::info!("Dispatching the dispatcher!");

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .dependencies(deps![store, settings])
        // Handle updates one by one, in order.
        .distribution_function(|_| Some(()))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("it appears we have been bonked.");
}
