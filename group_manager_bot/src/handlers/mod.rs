use std::sync::Arc;

use bot_commons::useful_methods::*;
use html_escape::encode_text;
use teloxide::{
    types::{Me, Message, User, UserId},
    Bot,
};

use crate::{
    config::Settings,
    escalation::{Action, Escalator, WarnOutcome},
    link_filter::{screen_message, Verdict},
    moderation::Removal,
    warnings::WarningStore,
    Error,
};

pub mod commands;

/// What a message means to this bot.
#[derive(Debug, PartialEq)]
enum Event<'a> {
    /// These people joined. Never includes the bot itself.
    Joined(Vec<&'a User>),
    Left(&'a User),
    /// Sent by the bot itself, or about the bot itself.
    Own,
    /// Anything else. Could be a command, could have links.
    Regular,
}

fn classify_event(message: &Message, me: UserId) -> Event<'_> {
    if let Some(new_members) = message.new_chat_members() {
        let joined: Vec<&User> = new_members.iter().filter(|x| x.id != me).collect();
        return match joined.is_empty() {
            true => Event::Own,
            false => Event::Joined(joined),
        };
    }

    if let Some(left_member) = message.left_chat_member() {
        return match left_member.id == me {
            true => Event::Own,
            false => Event::Left(left_member),
        };
    }

    // Bot ignores messages made by itself.
    if message.from.as_ref().is_some_and(|from| from.id == me) {
        return Event::Own;
    }

    Event::Regular
}

pub async fn handle_message(
    bot: Bot,
    me: Me,
    message: Message,
    store: Arc<WarningStore>,
    settings: Arc<Settings>,
) -> Result<(), Error> {
    match classify_event(&message, me.id) {
        Event::Joined(users) => {
            let chat_title = message.chat.title().unwrap_or("the group");
            for user in users {
                let text = welcome_text(&user.first_name, chat_title);
                bot.send_html(message.chat.id, &text, None).await?;
            }
        }
        Event::Left(user) => {
            bot.send_html(message.chat.id, &goodbye_text(&user.first_name), None)
                .await?;
        }
        Event::Own => {}
        Event::Regular => {
            // Links are checked first, so a command can't be used to sneak one in.
            if (message.chat.is_group() || message.chat.is_supergroup())
                && handle_links(&bot, &message, &store, &settings).await?
            {
                return Ok(());
            }
            commands::handle_command(&bot, &me, &message, &store).await?;
        }
    }

    Ok(())
}

fn welcome_text(first_name: &str, chat_title: &str) -> String {
    format!(
        "✨ Welcome {} to {}!",
        encode_text(first_name),
        encode_text(chat_title)
    )
}

fn goodbye_text(first_name: &str) -> String {
    format!("❌ {} left the group.", encode_text(first_name))
}

/// Delete the message and warn the sender if it has links they should not post.
///
/// Returns `true` if the message broke the rules, in which case it's
/// (hopefully) gone and nothing else should be done with it.
async fn handle_links(
    bot: &Bot,
    message: &Message,
    store: &WarningStore,
    settings: &Settings,
) -> Result<bool, Error> {
    let escalator = Escalator::new(store, bot);
    let verdict = screen_message(&escalator, settings.anti_links, message).await?;

    let Verdict::Violation { deleted, outcome } = verdict else {
        return Ok(false);
    };

    let name = encode_text(&message.sender_first_name()).into_owned();

    if deleted.is_err() {
        bot.send_html(
            message.chat.id,
            concat!(
                "Tried to delete a message containing a link, but failed. ",
                "Is this bot an admin with ability to delete messages?"
            ),
            None,
        )
        .await?;
    }

    bot.send_html(message.chat.id, &link_warning_text(&name, &outcome), None)
        .await?;

    if let Some(text) = escalation_text(&name, &outcome) {
        bot.send_html(message.chat.id, &text, None).await?;
    }

    Ok(true)
}

fn link_warning_text(name_html: &str, outcome: &WarnOutcome) -> String {
    format!(
        "⚠️ {name_html}, links are not allowed! ({})",
        outcome.progress()
    )
}

fn escalation_text(name_html: &str, outcome: &WarnOutcome) -> Option<String> {
    match outcome.action {
        Ok(Action::None) => None,
        Ok(Action::Removed(Removal::Kicked)) => Some(format!(
            "🚫 {name_html} has been kicked after {} warnings.",
            outcome.max_warns
        )),
        Ok(Action::Removed(Removal::StillBanned)) => Some(format!(
            "🚫 {name_html} has been removed after {} warnings. {}",
            outcome.max_warns,
            still_banned_note()
        )),
        Err(_) => Some("❌ Cannot kick user. Make sure I am admin.".to_string()),
    }
}

fn still_banned_note() -> &'static str {
    "Couldn't lift the ban afterwards, so unban them by hand to let them back in."
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use teloxide::{ApiError, RequestError};

    use super::*;
    use crate::testing::{group_message, group_text, user_json};

    const ME: UserId = UserId(5000);
    const USER: UserId = UserId(2);

    fn outcome(count: u32, action: Result<Action, RequestError>) -> WarnOutcome {
        WarnOutcome {
            count,
            max_warns: 3,
            action,
        }
    }

    #[test]
    fn first_warning_shows_progress() {
        let outcome = outcome(1, Ok(Action::None));
        assert_eq!(
            link_warning_text("Amogus", &outcome),
            "⚠️ Amogus, links are not allowed! (1/3)"
        );
        assert_eq!(escalation_text("Amogus", &outcome), None);
    }

    #[test]
    fn kick_and_failed_kick() {
        let kicked = outcome(3, Ok(Action::Removed(Removal::Kicked)));
        assert_eq!(
            escalation_text("Amogus", &kicked).unwrap(),
            "🚫 Amogus has been kicked after 3 warnings."
        );

        let banned = outcome(3, Ok(Action::Removed(Removal::StillBanned)));
        assert!(escalation_text("Amogus", &banned)
            .unwrap()
            .starts_with("🚫 Amogus has been removed after 3 warnings. Couldn't lift the ban"));

        let failed = outcome(3, Err(RequestError::Api(ApiError::NotEnoughRightsToRestrict)));
        assert_eq!(
            escalation_text("Amogus", &failed).unwrap(),
            "❌ Cannot kick user. Make sure I am admin."
        );
    }

    #[test]
    fn joins_and_leaves() {
        let message = group_message(
            ME,
            json!({ "new_chat_members": [user_json(USER, "Sus"), user_json(ME, "Bot")] }),
        );
        let Event::Joined(users) = classify_event(&message, ME) else {
            panic!("Expected a join");
        };
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, USER);

        let message = group_message(USER, json!({ "left_chat_member": user_json(USER, "Sus") }));
        assert!(matches!(
            classify_event(&message, ME),
            Event::Left(user) if user.id == USER
        ));

        assert_eq!(
            welcome_text("Sus", "Sussy <Group>"),
            "✨ Welcome Sus to Sussy &lt;Group&gt;!"
        );
        assert_eq!(goodbye_text("Sus"), "❌ Sus left the group.");
    }

    #[test]
    fn own_messages_and_events_are_ignored() {
        assert_eq!(classify_event(&group_text(ME, "/help"), ME), Event::Own);

        let message = group_message(USER, json!({ "new_chat_members": [user_json(ME, "Bot")] }));
        assert_eq!(classify_event(&message, ME), Event::Own);

        let message = group_message(USER, json!({ "left_chat_member": user_json(ME, "Bot") }));
        assert_eq!(classify_event(&message, ME), Event::Own);
    }

    #[test]
    fn everything_else_is_regular() {
        assert_eq!(classify_event(&group_text(USER, "hi"), ME), Event::Regular);
        assert_eq!(
            classify_event(&group_text(USER, "/warn https://a.b"), ME),
            Event::Regular
        );
    }
}
