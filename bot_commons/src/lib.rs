//! Stuff shared by the moderation bots in this workspace, because starting a
//! logger, reading a token and storing a JSON file is the same boilerplate
//! every time.

use std::future::Future;

use teloxide::types::ChatMemberStatus;

pub mod commands;
pub mod config;
pub mod json_db;
pub mod useful_methods;

/// Initialize logging and start the `closure` in an async runtime.
///
/// Logging uses the filter from environment variable `RUST_LOG`, or
/// `default_filter` if it's not set. This uses the crate
/// [pretty_env_logger][] internally, see its documentation for more details.
///
/// [pretty_env_logger]: https://docs.rs/pretty_env_logger
///
/// # Panics
///
/// Panics if the tokio runtime can't be built.
pub fn start_everything(default_filter: &str, closure: impl Future<Output = ()>) {
    let log_filter = std::env::var_os("RUST_LOG")
        .and_then(|x| x.into_string().ok())
        .unwrap_or_else(|| default_filter.to_string());

    // journald timestamps lines on its own.
    let running_as_systemd_service = std::env::var_os("JOURNAL_STREAM").is_some();

    let mut builder = match running_as_systemd_service {
        true => pretty_env_logger::formatted_builder(),
        false => pretty_env_logger::formatted_timed_builder(),
    };

    builder.parse_filters(&log_filter);

    if builder.try_init().is_err() {
        log::error!("Tried to init logger twice!");
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build the tokio runtime")
        .block_on(closure);
}

/// Whether this member status belongs to an administrator or the creator of the chat.
#[must_use]
pub fn is_privileged_status(status: ChatMemberStatus) -> bool {
    matches!(
        status,
        ChatMemberStatus::Owner | ChatMemberStatus::Administrator
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privileged_statuses() {
        assert!(is_privileged_status(ChatMemberStatus::Owner));
        assert!(is_privileged_status(ChatMemberStatus::Administrator));
        assert!(!is_privileged_status(ChatMemberStatus::Member));
        assert!(!is_privileged_status(ChatMemberStatus::Restricted));
        assert!(!is_privileged_status(ChatMemberStatus::Left));
        assert!(!is_privileged_status(ChatMemberStatus::Banned));
    }
}
