use bot_commons::json_db;
use teloxide::{
    types::{ChatId, UserId},
    RequestError,
};

use crate::{
    moderation::{remove_member, Moderator, Removal},
    warnings::WarningStore,
};

/// What was done to a user after they got a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Still has warnings to spare.
    None,
    /// Had too many and got removed from the chat. Their warnings are back to 0.
    Removed(Removal),
}

/// Result of [`Escalator::warn_user`].
#[derive(Debug)]
pub struct WarnOutcome {
    /// Warnings the user had right after this one, before any reset.
    pub count: u32,
    pub max_warns: u32,
    /// Kicking the user can fail, mostly for lack of rights. The warnings are
    /// then kept, and the next warning tries to kick them again.
    pub action: Result<Action, RequestError>,
}

impl WarnOutcome {
    /// Like `2/3`.
    pub fn progress(&self) -> String {
        format!("{}/{}", self.count, self.max_warns)
    }
}

/// Gives out warnings, and kicks users that have too many.
pub struct Escalator<'a, M> {
    store: &'a WarningStore,
    moderator: &'a M,
}

impl<'a, M: Moderator> Escalator<'a, M> {
    pub fn new(store: &'a WarningStore, moderator: &'a M) -> Self {
        Escalator { store, moderator }
    }

    pub fn moderator(&self) -> &'a M {
        self.moderator
    }

    pub fn max_warns(&self) -> u32 {
        self.store.max_warns()
    }

    /// Decide what to do with a user who now has `current_count` warnings.
    ///
    /// At or over the limit, the user is removed from the chat and their
    /// warnings are reset. If they could not be removed at all, the error is
    /// returned in the inner `Result` and the warnings stay as they are.
    ///
    /// # Errors
    ///
    /// The outer `Result` errors if resetting the warnings could not be saved.
    pub async fn after_warn(
        &self,
        chat: ChatId,
        user: UserId,
        current_count: u32,
    ) -> Result<Result<Action, RequestError>, json_db::Error> {
        if current_count < self.store.max_warns() {
            return Ok(Ok(Action::None));
        }

        log::info!("User {user} has {current_count} warnings in chat {chat}, kicking them.");

        match remove_member(self.moderator, chat, user).await {
            Ok(removal) => {
                self.store.reset_warnings(user).await?;
                Ok(Ok(Action::Removed(removal)))
            }
            Err(e) => {
                log::warn!("Cannot kick user {user} from chat {chat}: {e}");
                Ok(Err(e))
            }
        }
    }

    /// Give the user a warning, then kick them if it was one too many.
    ///
    /// # Errors
    ///
    /// Errors if the warning or the reset after a kick could not be saved.
    pub async fn warn_user(&self, chat: ChatId, user: UserId) -> Result<WarnOutcome, json_db::Error> {
        let count = self.store.record_violation(user).await?;
        log::debug!("Warned user {user} in chat {chat}, now at {count}.");

        let action = self.after_warn(chat, user, count).await?;

        Ok(WarnOutcome {
            count,
            max_warns: self.store.max_warns(),
            action,
        })
    }
}
