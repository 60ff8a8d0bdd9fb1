use std::sync::LazyLock;

use regex::Regex;

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+").expect("Regex will always be valid"));

/// Whether the text has an `http://` or `https://` link in it.
///
/// Only the scheme is looked at. `example.com` with no scheme is not a link.
#[must_use]
pub fn contains_link(text: &str) -> bool {
    LINK_REGEX.is_match(text)
}
