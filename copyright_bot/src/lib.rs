//! Source code for the copyright bot. It looks for suspicious words in
//! messages, notes down who said them, and tells the chat about it.

/// Settings read from the environment.
pub mod config;

/// Keyword matching.
pub mod classifier;

/// Log of flagged messages, stored in a JSON file.
pub mod reports;

mod error;
pub use error::Error;

/// Functions that handle events from Telegram.
mod handlers;

/// Entry function that starts the bot.
mod entry;
pub use entry::*;
