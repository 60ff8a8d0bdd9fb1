use std::path::PathBuf;

use bot_commons::config::{self, env_lookup, Error};

use crate::DEFAULT_MAX_WARNS;

pub const MAX_WARNS_VAR: &str = "MAX_WARNS";
pub const ANTI_LINKS_VAR: &str = "ANTI_LINKS";
pub const DATA_PATH_VAR: &str = "GC_DATA_PATH";

const DEFAULT_DATA_PATH: &str = "gc_data.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Warnings after which a user is kicked. Never 0.
    pub max_warns: u32,
    /// Whether to delete messages with links in them.
    pub anti_links: bool,
    /// Where the warning counters are stored.
    pub data_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_warns: DEFAULT_MAX_WARNS,
            anti_links: true,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
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

        let max_warns = config::parsed(&lookup, MAX_WARNS_VAR, defaults.max_warns)?;
        if max_warns == 0 {
            return Err(Error::Invalid {
                name: MAX_WARNS_VAR,
                value: max_warns.to_string(),
            });
        }

        Ok(Settings {
            max_warns,
            anti_links: config::flag(&lookup, ANTI_LINKS_VAR, defaults.anti_links)?,
            data_path: config::parsed(&lookup, DATA_PATH_VAR, defaults.data_path)?,
        })
    }
}
