use std::path::PathBuf;

use bot_commons::config::{self, env_lookup, Error};

use crate::classifier::KeywordClassifier;

pub const KEYWORDS_VAR: &str = "COPYRIGHT_KEYWORDS";
pub const DB_PATH_VAR: &str = "COPYRIGHT_DB_PATH";
pub const DELETE_FLAGGED_VAR: &str = "COPYRIGHT_DELETE_FLAGGED";

const DEFAULT_DB_PATH: &str = "db.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub classifier: KeywordClassifier,
    /// Where flagged messages are logged.
    pub db_path: PathBuf,
    /// Whether to also delete flagged messages.
    pub delete_flagged: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            classifier: KeywordClassifier::default(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            delete_flagged: false,
        }
    }
}

impl Settings {
    /// # Errors
    ///
    /// Errors if any of the variables has an invalid value.
    pub fn from_env() -> Result<Settings, Error> {
        Self::from_lookup(env_lookup)
    }

    /// # Errors
    ///
    /// Errors if any of the variables has an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings, Error> {
        let defaults = Settings::default();

        let classifier = match config::list(&lookup, KEYWORDS_VAR) {
            Some(keywords) => KeywordClassifier::new(keywords),
            None => defaults.classifier,
        };

        Ok(Settings {
            classifier,
            db_path: config::parsed(&lookup, DB_PATH_VAR, defaults.db_path)?,
            delete_flagged: config::flag(&lookup, DELETE_FLAGGED_VAR, defaults.delete_flagged)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(
            settings.classifier.keywords(),
            ["copyright", "infringement", "steal", "unauthorized"]
        );
        assert_eq!(settings.db_path, PathBuf::from("db.json"));
        assert!(!settings.delete_flagged);
    }

    #[test]
    fn overrides() {
        let settings = Settings::from_lookup(|name| match name {
            "COPYRIGHT_KEYWORDS" => Some("Piracy,warez".to_string()),
            "COPYRIGHT_DB_PATH" => Some("/var/lib/copyright/db.json".to_string()),
            "COPYRIGHT_DELETE_FLAGGED" => Some("yes".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.classifier.keywords(), ["piracy", "warez"]);
        assert_eq!(settings.db_path, PathBuf::from("/var/lib/copyright/db.json"));
        assert!(settings.delete_flagged);
    }

    #[test]
    fn blank_keywords_keep_defaults() {
        let settings =
            Settings::from_lookup(|name| (name == KEYWORDS_VAR).then(|| " , ".to_string()))
                .unwrap();
        assert_eq!(settings.classifier, KeywordClassifier::default());
    }

    #[test]
    fn bad_flag() {
        let result =
            Settings::from_lookup(|name| (name == DELETE_FLAGGED_VAR).then(|| "sure".to_string()));
        assert!(matches!(
            result,
            Err(Error::Invalid {
                name: "COPYRIGHT_DELETE_FLAGGED",
                ..
            })
        ));
    }
}
