//! A tiny database that is just one JSON document in a file.
//!
//! The whole document lives in memory behind a mutex. Every change is written
//! out in full before it becomes visible, so what other callers see is always
//! what is on disk.

use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not (de)serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Error::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub struct JsonDatabase<T> {
    path: PathBuf,
    data: Mutex<T>,
}

impl<T> JsonDatabase<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send,
{
    /// Open the document at `path`.
    ///
    /// A missing or empty file starts out as `T::default()`. Either way the
    /// document is written back right away, so a broken path is noticed on
    /// startup and not on the first change.
    ///
    /// # Errors
    ///
    /// Errors if the file can't be read or written, or has invalid contents.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();

        let data = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => T::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| Error::json(&path, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("{} does not exist, creating it.", path.display());
                T::default()
            }
            Err(e) => return Err(Error::io(&path, e)),
        };

        write_document(&path, &data).await?;

        Ok(JsonDatabase {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look at the document.
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let data = self.data.lock().await;
        f(&data)
    }

    /// Change the document and persist it.
    ///
    /// The change is made to a copy that replaces the document only once it
    /// has been written successfully. If writing fails, nothing changes.
    ///
    /// # Errors
    ///
    /// Errors if the document could not be written.
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, Error> {
        let mut data = self.data.lock().await;

        let mut staged = data.clone();
        let result = f(&mut staged);

        write_document(&self.path, &staged).await?;
        *data = staged;

        Ok(result)
    }
}

/// Write the document to a temporary file next to `path`, then move it over `path`.
async fn write_document<T: Serialize>(path: &Path, data: &T) -> Result<(), Error> {
    let bytes = serde_json::to_vec_pretty(data).map_err(|e| Error::json(path, e))?;

    let mut tmp_path = path.as_os_str().to_os_string();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| Error::io(&tmp_path, e))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::io(path, e))?;

    Ok(())
}
