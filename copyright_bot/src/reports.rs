use std::path::PathBuf;

use bot_commons::json_db::{Error, JsonDatabase};
use chrono::{DateTime, Utc};
use html_escape::encode_text;
use serde::{Deserialize, Serialize};

/// One flagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Username of the sender, or their first name if they have none.
    pub user: String,
    /// Text of the message as it was sent.
    pub message: String,
    /// When it was flagged. Stored as an ISO 8601 string.
    pub date: DateTime<Utc>,
}

/// Layout of the data file: `{ "logs": [ { "user", "message", "date" } ] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportsData {
    #[serde(default)]
    pub logs: Vec<Report>,
}

/// Every message flagged so far, oldest first. Only ever grows.
pub struct ViolationLog {
    db: JsonDatabase<ReportsData>,
}

impl ViolationLog {
    /// # Errors
    ///
    /// Errors if the data file can't be read, parsed or written.
    pub async fn open(path: impl Into<PathBuf>) -> Result<ViolationLog, Error> {
        let db = JsonDatabase::<ReportsData>::open(path).await?;
        let count = db.read(|data| data.logs.len()).await;
        log::info!("Loaded {count} reports from {}", db.path().display());
        Ok(ViolationLog { db })
    }

    /// Add a report and save it. Returns how many there are now.
    ///
    /// # Errors
    ///
    /// Errors if the report could not be saved. It's not added then.
    pub async fn record(&self, report: Report) -> Result<usize, Error> {
        self.db
            .update(|data| {
                data.logs.push(report);
                data.logs.len()
            })
            .await
    }

    pub async fn count(&self) -> usize {
        self.db.read(|data| data.logs.len()).await
    }

    pub async fn reports(&self) -> Vec<Report> {
        self.db.read(|data| data.logs.clone()).await
    }
}

/// HTML text of the `/reports` answer. One numbered line per report.
#[must_use]
pub fn format_reports(reports: &[Report]) -> String {
    if reports.is_empty() {
        return "No reports yet!".to_string();
    }

    let mut text = "📄 Reports:\n".to_string();
    for (i, report) in reports.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}: \"{}\"\n",
            i + 1,
            encode_text(&report.user),
            encode_text(&report.message)
        ));
    }
    text
}
