use bot_commons::json_db;
use teloxide::RequestError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Telegram request failed: {0}")]
    Request(#[from] RequestError),
    #[error("Database died: {0}")]
    Database(#[from] json_db::Error),
}
