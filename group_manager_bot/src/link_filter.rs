use bot_commons::useful_methods::MessageStuff;
use teloxide::{
    types::{ChatId, Message, MessageId, UserId},
    RequestError,
};

use crate::{
    classifier::contains_link,
    escalation::{Escalator, WarnOutcome},
    moderation::{is_privileged, Moderator},
    Error,
};

/// What the link filter made of a message.
#[derive(Debug)]
pub enum Verdict {
    /// No links, or the filter is off.
    Clean,
    /// Has links, but was sent by an admin.
    Exempt,
    /// Has links. The message was deleted (hopefully) and the sender warned.
    Violation {
        deleted: Result<(), RequestError>,
        outcome: WarnOutcome,
    },
}

/// Run the link filter on a message with this `text`, sent by `sender`.
///
/// # Errors
///
/// Errors if looking up the sender fails, or if their warning can't be saved.
pub async fn filter_links<M: Moderator>(
    escalator: &Escalator<'_, M>,
    enabled: bool,
    chat: ChatId,
    message: MessageId,
    sender: UserId,
    text: &str,
) -> Result<Verdict, Error> {
    if !enabled || !contains_link(text) {
        return Ok(Verdict::Clean);
    }

    if is_privileged(escalator.moderator(), chat, sender).await? {
        log::debug!("Skipping a link from an admin.");
        return Ok(Verdict::Exempt);
    }

    let deleted = escalator.moderator().remove_message(chat, message).await;
    if let Err(e) = &deleted {
        log::warn!("Failed to delete a message with a link in chat {chat}: {e}");
    }

    let outcome = escalator.warn_user(chat, sender).await?;

    Ok(Verdict::Violation { deleted, outcome })
}

/// Run the link filter on any message in a group, commands included.
///
/// Messages posted on behalf of a chat, like by an anonymous admin or a linked
/// channel, have no user to warn and are left alone.
///
/// # Errors
///
/// Same as [`filter_links`].
pub async fn screen_message<M: Moderator>(
    escalator: &Escalator<'_, M>,
    enabled: bool,
    message: &Message,
) -> Result<Verdict, Error> {
    let Some(text) = message.text_full() else {
        return Ok(Verdict::Clean);
    };
    if message.sender_chat.is_some() {
        return Ok(Verdict::Clean);
    }
    let Some(sender) = &message.from else {
        return Ok(Verdict::Clean);
    };

    filter_links(escalator, enabled, message.chat.id, message.id, sender.id, text).await
}
