//! Source code for the group manager bot. It deletes messages with links,
//! counts warnings per user and kicks people who collect too many, and gives
//! admins a few commands to moderate by hand.

/// Settings read from the environment.
pub mod config;

/// Checks for messages that break the rules.
mod classifier;

/// Per-user warning counters, stored in a JSON file.
pub mod warnings;

/// Moderation actions the bot can take in a chat.
pub mod moderation;

/// What happens once a user runs out of warnings.
pub mod escalation;

/// The automatic link filter.
mod link_filter;

/// Errors that abort handling an update.
mod error;
pub use error::Error;

/// Functions that handle events from Telegram.
mod handlers;

/// Entry function that starts the bot.
mod entry;
pub use entry::*;

#[cfg(test)]
mod testing;

/// Warnings a user can get before being kicked, unless configured otherwise.
pub const DEFAULT_MAX_WARNS: u32 = 3;

/// How long `/mute` lasts if no duration is given.
pub const DEFAULT_MUTE_MINUTES: u32 = 10;
