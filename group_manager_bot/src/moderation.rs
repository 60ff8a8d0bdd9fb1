use std::future::Future;

use bot_commons::is_privileged_status;
use chrono::{DateTime, TimeDelta, Utc};
use teloxide::{
    payloads::{RestrictChatMemberSetters, UnbanChatMemberSetters},
    prelude::*,
    types::{ChatMemberStatus, ChatPermissions, MessageId},
    RequestError,
};

/// Things the bot can do to members and messages of a chat.
///
/// Implemented for [`Bot`]. Everything that decides *when* to do these lives
/// elsewhere and only talks to this trait.
pub trait Moderator {
    fn member_status(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> impl Future<Output = Result<ChatMemberStatus, RequestError>> + Send;

    fn remove_message(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    /// Set what the member is allowed to do, until `until` or forever.
    fn restrict_member(
        &self,
        chat: ChatId,
        user: UserId,
        permissions: ChatPermissions,
        until: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    /// Kick the member out for good.
    fn ban_member(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    /// Lift a ban, if there is one, so they can join back.
    fn unban_member(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;
}

/// How a member was removed by [`remove_member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Out of the chat, and free to join back.
    Kicked,
    /// Out of the chat, but lifting the ban failed, so they are still banned.
    StillBanned,
}

impl Moderator for Bot {
    async fn member_status(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> Result<ChatMemberStatus, RequestError> {
        Ok(self.get_chat_member(chat, user).await?.kind.status())
    }

    async fn remove_message(&self, chat: ChatId, message: MessageId) -> Result<(), RequestError> {
        self.delete_message(chat, message).await?;
        Ok(())
    }

    async fn restrict_member(
        &self,
        chat: ChatId,
        user: UserId,
        permissions: ChatPermissions,
        until: Option<DateTime<Utc>>,
    ) -> Result<(), RequestError> {
        let request = self.restrict_chat_member(chat, user, permissions);
        match until {
            Some(until) => request.until_date(until).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn ban_member(&self, chat: ChatId, user: UserId) -> Result<(), RequestError> {
        self.ban_chat_member(chat, user).await?;
        Ok(())
    }

    async fn unban_member(&self, chat: ChatId, user: UserId) -> Result<(), RequestError> {
        self.unban_chat_member(chat, user)
            .only_if_banned(true)
            .await?;
        Ok(())
    }
}

/// Kick the member out. They can join back later.
///
/// Telegram has no "kick", only a ban that we lift right away. Once the ban
/// went through the member is out, so failing to lift it is not an error.
///
/// # Errors
///
/// Errors if the ban fails, in which case the member is still in the chat.
pub async fn remove_member<M: Moderator>(
    moderator: &M,
    chat: ChatId,
    user: UserId,
) -> Result<Removal, RequestError> {
    moderator.ban_member(chat, user).await?;
    match moderator.unban_member(chat, user).await {
        Ok(()) => Ok(Removal::Kicked),
        Err(e) => {
            log::warn!("Banned user {user} in chat {chat}, but could not unban them: {e}");
            Ok(Removal::StillBanned)
        }
    }
}

/// Whether this user is an administrator or the creator of the chat.
pub async fn is_privileged<M: Moderator>(
    moderator: &M,
    chat: ChatId,
    user: UserId,
) -> Result<bool, RequestError> {
    Ok(is_privileged_status(
        moderator.member_status(chat, user).await?,
    ))
}

/// Permissions of a muted member: nothing.
#[must_use]
pub fn muted_permissions() -> ChatPermissions {
    ChatPermissions::empty()
}

/// Permissions given back on unmute.
#[must_use]
pub fn unmuted_permissions() -> ChatPermissions {
    ChatPermissions::SEND_MESSAGES
        | ChatPermissions::SEND_MEDIA_MESSAGES
        | ChatPermissions::SEND_OTHER_MESSAGES
        | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
}

/// Get mute duration in minutes from the first `/mute` parameter, like `parseInt` does it:
/// leading digits count, anything after them is ignored. Missing, non-numeric or zero
/// durations fall back to [`crate::DEFAULT_MUTE_MINUTES`].
#[must_use]
pub fn mute_minutes(param: Option<&str>) -> u32 {
    param
        .map(|x| {
            let digits_end = x.find(|c: char| !c.is_ascii_digit()).unwrap_or(x.len());
            &x[..digits_end]
        })
        .and_then(|digits| digits.parse::<u32>().ok())
        .filter(|&minutes| minutes > 0)
        .unwrap_or(crate::DEFAULT_MUTE_MINUTES)
}

/// When a mute of this many minutes starting at `now` ends.
#[must_use]
pub fn mute_until(now: DateTime<Utc>, minutes: u32) -> DateTime<Utc> {
    now + TimeDelta::minutes(minutes.into())
}
