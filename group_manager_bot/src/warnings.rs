use std::{collections::BTreeMap, path::PathBuf};

use bot_commons::json_db::{Error, JsonDatabase};
use serde::{Deserialize, Serialize};
use teloxide::types::UserId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWarns {
    #[serde(default)]
    pub warns: u32,
}

/// Layout of the data file:
/// `{ "users": { "<user id>": { "warns": 1 } }, "logs": [] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupData {
    #[serde(default)]
    pub users: BTreeMap<u64, UserWarns>,
    /// Not used by anything, but kept as is so the file keeps its shape.
    #[serde(default)]
    pub logs: Vec<serde_json::Value>,
}

/// Warning counters of every user the bot has warned so far.
///
/// Counters never go above `max_warns`. A user that reached it stays there
/// until [`WarningStore::reset_warnings`].
pub struct WarningStore {
    db: JsonDatabase<GroupData>,
    max_warns: u32,
}

impl WarningStore {
    /// # Errors
    ///
    /// Errors if the data file can't be read, parsed or written.
    pub async fn open(path: impl Into<PathBuf>, max_warns: u32) -> Result<WarningStore, Error> {
        let db = JsonDatabase::<GroupData>::open(path).await?;
        let users = db.read(|data| data.users.len()).await;
        log::info!(
            "Loaded warnings of {users} users from {}",
            db.path().display()
        );
        Ok(WarningStore { db, max_warns })
    }

    pub fn max_warns(&self) -> u32 {
        self.max_warns
    }

    /// Add a warning to this user and return how many they have now.
    ///
    /// # Errors
    ///
    /// Errors if the change could not be saved, in which case nothing changed.
    pub async fn record_violation(&self, user: UserId) -> Result<u32, Error> {
        let max_warns = self.max_warns;
        self.db
            .update(|data| {
                let entry = data.users.entry(user.0).or_default();
                if entry.warns < max_warns {
                    entry.warns += 1;
                }
                entry.warns
            })
            .await
    }

    /// How many warnings this user has. Unknown users have 0.
    pub async fn get_warnings(&self, user: UserId) -> u32 {
        self.db
            .read(|data| data.users.get(&user.0).map_or(0, |x| x.warns))
            .await
    }

    /// # Errors
    ///
    /// Errors if the change could not be saved, in which case nothing changed.
    pub async fn reset_warnings(&self, user: UserId) -> Result<(), Error> {
        self.db
            .update(|data| {
                if let Some(entry) = data.users.get_mut(&user.0) {
                    entry.warns = 0;
                }
            })
            .await
    }
}
