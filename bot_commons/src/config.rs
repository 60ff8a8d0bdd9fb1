//! Reading settings from environment variables.
//!
//! Every helper here takes a `lookup` function instead of reading the
//! environment directly, so settings can be built from anything that maps
//! a variable name to a value. Use [`env_lookup`] for the real thing.

use std::str::FromStr;

/// Name of the environment variable holding the Telegram bot token.
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} is not defined in environment variables!")]
    Missing(&'static str),
    #[error("Environment variable {name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Lookup function reading the process environment.
#[must_use]
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Load the bot token from [`BOT_TOKEN_VAR`].
///
/// # Errors
///
/// Errors if the variable is missing or blank.
pub fn bot_token() -> Result<String, Error> {
    required(env_lookup, BOT_TOKEN_VAR)
}

/// Get a variable that must be present and not blank. Surrounding whitespace is trimmed.
///
/// # Errors
///
/// Errors if the variable is missing or blank.
pub fn required(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, Error> {
    lookup(name)
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .ok_or(Error::Missing(name))
}

/// Get a variable and parse it, or use `default` if it's not set or blank.
///
/// # Errors
///
/// Errors if the variable is set but doesn't parse.
pub fn parsed<T: FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, Error> {
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed.parse().map_err(|_| Error::Invalid { name, value })
}

/// Get a boolean flag. Accepts `true`/`false`, `yes`/`no`, `on`/`off` and `1`/`0`,
/// in any case, or uses `default` if it's not set or blank.
///
/// # Errors
///
/// Errors if the variable is set to anything else.
pub fn flag(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: bool,
) -> Result<bool, Error> {
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::Invalid { name, value }),
    }
}

/// Get a comma separated list. Empty items are skipped.
/// Returns [`None`] if the variable is not set or has no items.
#[must_use]
pub fn list(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<Vec<String>> {
    let items: Vec<String> = lookup(name)?
        .split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(String::from)
        .collect();

    (!items.is_empty()).then_some(items)
}
