/// Words that get a message flagged, unless configured otherwise.
pub const DEFAULT_KEYWORDS: &[&str] = &["copyright", "infringement", "steal", "unauthorized"];

/// Flags messages that mention any of a set of keywords, in any case.
///
/// This is plain substring matching. "stealthy" counts as "steal".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordClassifier {
    /// All lowercase.
    keywords: Vec<String>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        KeywordClassifier::new(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl KeywordClassifier {
    /// Blank keywords are dropped, as they would match everything.
    pub fn new<S: AsRef<str>>(keywords: impl IntoIterator<Item = S>) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|x| x.as_ref().trim().to_lowercase())
            .filter(|x| !x.is_empty())
            .collect();
        KeywordClassifier { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    pub fn is_flagged(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keywords() {
        let classifier = KeywordClassifier::default();
        assert!(classifier.is_flagged("this is COPYRIGHT infringement"));
        assert!(classifier.is_flagged("Unauthorized copy"));
        assert!(classifier.is_flagged("a stealthy approach"));
        assert!(!classifier.is_flagged("hello there"));
        assert!(!classifier.is_flagged(""));
    }

    #[test]
    fn same_answer_every_time() {
        let classifier = KeywordClassifier::default();
        let text = "Don't sTeAl my art";
        let first = classifier.is_flagged(text);
        for _ in 0..10 {
            assert_eq!(classifier.is_flagged(text), first);
        }
        assert!(first);
    }

    #[test]
    fn custom_keywords_are_lowercased() {
        let classifier = KeywordClassifier::new(["Piracy", " WAREZ ", ""]);
        assert_eq!(classifier.keywords(), ["piracy", "warez"]);
        assert!(classifier.is_flagged("free warez here"));
        assert!(classifier.is_flagged("PIRACY"));
        assert!(!classifier.is_flagged("copyright"));
    }

    #[test]
    fn no_keywords_flags_nothing() {
        let classifier = KeywordClassifier::new(Vec::<String>::new());
        assert!(!classifier.is_flagged("copyright"));
    }
}
