use bot_commons::{
    commands::{generate_help, parse_command, CommandInfo, ParsedCommand},
    useful_methods::*,
};
use chrono::Utc;
use html_escape::encode_text;
use teloxide::{
    types::{ChatId, Me, Message, UserId},
    Bot, RequestError,
};

use crate::{
    escalation::Escalator,
    moderation::{
        is_privileged, mute_minutes, mute_until, muted_permissions, remove_member,
        unmuted_permissions, Moderator, Removal,
    },
    warnings::WarningStore,
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
        callname: "/warn",
        params: "",
        description: "warn the replied user, kicking them once they have too many warnings",
    },
    CommandInfo {
        callname: "/mute",
        params: "[minutes]",
        description: "mute the replied user, for 10 minutes by default",
    },
    CommandInfo {
        callname: "/unmute",
        params: "",
        description: "unmute the replied user",
    },
    CommandInfo {
        callname: "/kick",
        params: "",
        description: "kick the replied user",
    },
    CommandInfo {
        callname: "/ban",
        params: "",
        description: "ban the replied user",
    },
    CommandInfo {
        callname: "/warns",
        params: "",
        description: "show how many warnings the replied user has",
    },
    CommandInfo {
        callname: "/resetwarns",
        params: "",
        description: "clear the warnings of the replied user",
    },
];

/// Commands that act on the user whose message the command replies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Moderation {
    Warn,
    Mute,
    Unmute,
    Kick,
    Ban,
    Warns,
    ResetWarns,
}

impl Moderation {
    fn from_callname(callname: &str) -> Option<Moderation> {
        use Moderation::*;
        Some(match callname {
            "/warn" => Warn,
            "/mute" => Mute,
            "/unmute" => Unmute,
            "/kick" => Kick,
            "/ban" => Ban,
            "/warns" => Warns,
            "/resetwarns" => ResetWarns,
            _ => return None,
        })
    }

    fn usage(self) -> &'static str {
        use Moderation::*;
        match self {
            Warn => "Reply to a user to warn them.",
            Mute => "Reply to a user to mute them.",
            Unmute => "Reply to a user to unmute them.",
            Kick => "Reply to a user to kick them.",
            Ban => "Reply to a user to ban them.",
            Warns => "Reply to a user to check warns.",
            ResetWarns => "Reply to a user to reset their warns.",
        }
    }

    /// Anyone can look at warnings. Everything else needs an admin.
    fn admin_only(self) -> bool {
        self != Moderation::Warns
    }
}

/// Returns `true` if a command was parsed and responded to.
pub async fn handle_command(
    bot: &Bot,
    me: &Me,
    message: &Message,
    store: &WarningStore,
) -> Result<bool, Error> {
    let Some(response) = command_reply(bot, store, me.username(), message).await? else {
        return Ok(false);
    };
    bot.send_html(message.chat.id, &response, message.id).await?;
    Ok(true)
}

/// Run the command in this message, if it has one of ours, and return what
/// to reply with.
async fn command_reply<M: Moderator>(
    moderator: &M,
    store: &WarningStore,
    bot_username: &str,
    message: &Message,
) -> Result<Option<String>, Error> {
    let Some(text) = message.text() else {
        return Ok(None);
    };
    let Some(command) = parse_command(text, bot_username) else {
        return Ok(None);
    };

    let response = match command.callname.as_str() {
        "/start" => format!(
            "👋 Hello {}! I'm your Group Manager Bot!",
            encode_text(&message.sender_first_name())
        ),
        "/help" => generate_help("Commands:", COMMANDS),
        callname => {
            let Some(moderation) = Moderation::from_callname(callname) else {
                return Ok(None);
            };
            moderation_reply(moderator, store, message, moderation, &command).await?
        }
    };

    Ok(Some(response))
}

/// Anonymous admins post on behalf of the chat itself.
async fn is_issuer_admin<M: Moderator>(
    moderator: &M,
    message: &Message,
) -> Result<bool, RequestError> {
    if let Some(chat) = &message.sender_chat {
        return Ok(chat.id == message.chat.id);
    }
    let Some(issuer) = &message.from else {
        return Ok(false);
    };
    is_privileged(moderator, message.chat.id, issuer.id).await
}

/// Check that a moderation command can be done at all, then do it.
/// Nothing changes unless all checks pass.
async fn moderation_reply<M: Moderator>(
    moderator: &M,
    store: &WarningStore,
    message: &Message,
    moderation: Moderation,
    command: &ParsedCommand<'_>,
) -> Result<String, Error> {
    let chat = message.chat.id;

    let Some(target) = message.reply_to_message().and_then(|x| x.from.as_ref()) else {
        return Ok(moderation.usage().to_string());
    };

    if !(message.chat.is_group() || message.chat.is_supergroup()) {
        return Ok("This command only works in groups.".to_string());
    }

    if moderation.admin_only() && !is_issuer_admin(moderator, message).await? {
        return Ok("Only admins can do that.".to_string());
    }

    let name = encode_text(&target.first_name);
    run_moderation(
        moderator,
        store,
        moderation,
        command.first_param(),
        chat,
        target.id,
        &name,
    )
    .await
}

/// Do the thing to the target and return what to say about it.
async fn run_moderation<M: Moderator>(
    moderator: &M,
    store: &WarningStore,
    moderation: Moderation,
    param: Option<&str>,
    chat: ChatId,
    target: UserId,
    name_html: &str,
) -> Result<String, Error> {
    let max_warns = store.max_warns();

    let response = match moderation {
        Moderation::Warn => {
            if is_privileged(moderator, chat, target).await? {
                format!("⚠️ {name_html} is an admin and can't be warned.")
            } else {
                let outcome = Escalator::new(store, moderator)
                    .warn_user(chat, target)
                    .await?;
                let mut response =
                    format!("⚠️ {name_html} has been warned ({}).", outcome.progress());
                if let Some(escalation) = super::escalation_text(name_html, &outcome) {
                    response.push('\n');
                    response.push_str(&escalation);
                }
                response
            }
        }
        Moderation::Mute => {
            let minutes = mute_minutes(param);
            let until = mute_until(Utc::now(), minutes);
            match moderator
                .restrict_member(chat, target, muted_permissions(), Some(until))
                .await
            {
                Ok(()) => format!("🔇 {name_html} muted for {minutes} minutes."),
                Err(e) => cannot("mute", target, e),
            }
        }
        Moderation::Unmute => {
            match moderator
                .restrict_member(chat, target, unmuted_permissions(), None)
                .await
            {
                Ok(()) => format!("🔊 {name_html} has been unmuted."),
                Err(e) => cannot("unmute", target, e),
            }
        }
        Moderation::Kick => match remove_member(moderator, chat, target).await {
            Ok(Removal::Kicked) => format!("🚫 {name_html} has been kicked."),
            Ok(Removal::StillBanned) => format!(
                "🚫 {name_html} has been removed. {}",
                super::still_banned_note()
            ),
            Err(e) => cannot("kick", target, e),
        },
        Moderation::Ban => match moderator.ban_member(chat, target).await {
            Ok(()) => format!("⛔ {name_html} has been banned."),
            Err(e) => cannot("ban", target, e),
        },
        Moderation::Warns => {
            let warns = store.get_warnings(target).await;
            format!("⚠️ {name_html} has {warns}/{max_warns} warnings.")
        }
        Moderation::ResetWarns => {
            store.reset_warnings(target).await?;
            format!("✅ Warnings of {name_html} were reset (0/{max_warns}).")
        }
    };

    Ok(response)
}

fn cannot(action: &str, target: UserId, error: RequestError) -> String {
    log::warn!("Cannot {action} user {target}: {error}");
    format!("❌ Cannot {action} user. Make sure I am admin.")
}
