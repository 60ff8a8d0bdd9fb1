use std::sync::Arc;

use bot_commons::{
    commands::{generate_help, parse_command, CommandInfo},
    json_db,
    useful_methods::*,
};
use chrono::{DateTime, Utc};
use html_escape::encode_text;
use teloxide::{prelude::*, types::Me};

use crate::{
    classifier::KeywordClassifier,
    config::Settings,
    reports::{format_reports, Report, ViolationLog},
    Error,
};

pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        callname: "/start",
        params: "",
        description: "say hi",
    },
    CommandInfo {
        callname: "/help",
        params: "",
        description: "list the commands",
    },
    CommandInfo {
        callname: "/status",
        params: "",
        description: "check logs",
    },
    CommandInfo {
        callname: "/reports",
        params: "",
        description: "view all reports",
    },
];

pub async fn handle_message(
    bot: Bot,
    me: Me,
    message: Message,
    violations: Arc<ViolationLog>,
    settings: Arc<Settings>,
) -> Result<(), Error> {
    // Bot ignores messages made by itself.
    if message.from.as_ref().is_some_and(|from| from.id == me.id) {
        return Ok(());
    }

    if handle_command(&bot, &me, &message, &violations).await? {
        return Ok(());
    }

    let Some(text) = message.text_full() else {
        return Ok(());
    };

    if !flag_message(
        &settings.classifier,
        &violations,
        message.sender_short_name(),
        text,
        Utc::now(),
    )
    .await?
    {
        return Ok(());
    }

    log::info!(
        "Flagged a message from {} in chat {}",
        message.sender_short_name(),
        message.chat.id
    );

    let warning = format!(
        "⚠️ {}, your message might violate copyright!",
        encode_text(&message.sender_first_name())
    );

    if settings.delete_flagged {
        if let Err(e) = bot.delete_message(message.chat.id, message.id).await {
            log::warn!("Failed to delete a flagged message: {e}");
            bot.send_html(message.chat.id, &warning, message.id).await?;
        } else {
            bot.send_html(message.chat.id, &warning, None).await?;
        }
    } else {
        bot.send_html(message.chat.id, &warning, message.id).await?;
    }

    Ok(())
}

/// Note the message down if it's flagged. Returns whether it was.
///
/// # Errors
///
/// Errors if the report could not be saved.
async fn flag_message(
    classifier: &KeywordClassifier,
    violations: &ViolationLog,
    user: String,
    text: &str,
    now: DateTime<Utc>,
) -> Result<bool, json_db::Error> {
    if !classifier.is_flagged(text) {
        return Ok(false);
    }

    violations.record(Report {
        user,
        message: text.to_string(),
        date: now,
    })
    .await?;

    Ok(true)
}

fn status_text(count: usize) -> String {
    format!("📊 Total flagged messages: {count}")
}

/// Returns `true` if a command was parsed and responded to.
async fn handle_command(
    bot: &Bot,
    me: &Me,
    message: &Message,
    violations: &ViolationLog,
) -> Result<bool, Error> {
    let Some(text) = message.text() else {
        return Ok(false);
    };
    let Some(command) = parse_command(text, me.username()) else {
        return Ok(false);
    };

    let response = match command.callname.as_str() {
        "/start" => "👋 Welcome! I protect your group from copyright violations.".to_string(),
        "/help" => generate_help("Commands:", COMMANDS),
        "/status" => status_text(violations.count().await),
        "/reports" => format_reports(&violations.reports().await),
        _ => return Ok(false),
    };

    // Long report lists get split over several messages.
    bot.send_html(message.chat.id, &response, message.id)
        .await?;

    Ok(true)
}
