use std::sync::Arc;

use bot_commons::{commands::generate_bot_commands, config::bot_token};
use teloxide::{dptree::deps, prelude::*};

use crate::{
    config::Settings,
    handlers::{self, COMMANDS},
    reports::ViolationLog,
};

/// # Panics
///
/// Panics if the bot token or the settings in the environment are bad,
/// or if the report log can't be loaded.
pub async fn entry() {
    log::info!("ASYNC WOOOO");
    let token = bot_token().expect("Could not get the bot token!");
    let settings = Settings::from_env().expect("Bad settings!");

    log::info!(
        "Looking for {:?}, deleting flagged messages: {}",
        settings.classifier.keywords(),
        settings.delete_flagged
    );

    let bot = Bot::new(token);

    bot.set_my_commands(generate_bot_commands(COMMANDS))
        .await
        .expect("Failed to set bot commands!");

    let violations = Arc::new(
        ViolationLog::open(settings.db_path.clone())
            .await
            .expect("Failed to load the reports!"),
    );
    let settings = Arc::new(settings);

    log::info!("Creating the handler...");

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    log::info!("Dispatching the dispatcher!");

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .dependencies(deps![violations, settings])
        // Handle updates one by one, in order.
        .distribution_function(|_| Some(()))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("it appears we have been bonked.");
}
