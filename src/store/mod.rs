pub mod backend;
pub mod docs;
pub mod io;
pub mod links;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use backend::{FileStorage, Storage};
pub use docs::{Document, DocumentStore};
pub use links::ShareRecordStore;

const DATA_DIR_ENV: &str = "SEALNOTE_DATA_DIR";
const APP_DIR: &str = "sealnote";
const DOCUMENTS_FILE: &str = "documents.json";
const LINKS_FILE: &str = "links.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to determine data directory")]
    DataDirUnavailable,

    #[error(transparent)]
    Io(#[from] io::StoreIoError),

    #[error("stored data is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document '{0}' does not exist")]
    DocumentNotFound(String),
}

/// Resolve the directory holding both collections.
pub fn data_dir(override_path: Option<&Path>) -> Result<PathBuf, StoreError> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    let mut dir = dirs::data_dir().ok_or(StoreError::DataDirUnavailable)?;
    dir.push(APP_DIR);
    Ok(dir)
}

pub fn documents_storage(data_dir: &Path) -> FileStorage {
    FileStorage::new(data_dir.join(DOCUMENTS_FILE))
}

pub fn links_storage(data_dir: &Path) -> FileStorage {
    FileStorage::new(data_dir.join(LINKS_FILE))
}

fn load_or_default<T, S>(storage: &S) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
    S: Storage,
{
    parse_or_default(storage.load()?)
}

fn parse_or_default<T>(bytes: Option<Vec<u8>>) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match bytes {
        Some(bytes) if !bytes.is_empty() => Ok(serde_json::from_slice(&bytes)?),
        _ => Ok(T::default()),
    }
}

/// Load, change and save a collection as one locked step.
///
/// An error from `change` aborts the whole update and nothing is written.
fn modify<T, S, R>(
    storage: &S,
    change: impl FnOnce(&mut T) -> Result<R, StoreError>,
) -> Result<R, StoreError>
where
    T: Serialize + DeserializeOwned + Default,
    S: Storage,
{
    storage.update(|current| {
        let mut value: T = parse_or_default(current)?;
        let outcome = change(&mut value)?;
        Ok((serde_json::to_vec_pretty(&value)?, outcome))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_wins() {
        let dir = data_dir(Some(Path::new("/tmp/sealnote-data"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/sealnote-data"));
    }

    #[test]
    fn collections_live_side_by_side() {
        let dir = Path::new("/var/lib/sealnote");
        assert_eq!(
            documents_storage(dir).path(),
            Path::new("/var/lib/sealnote/documents.json")
        );
        assert_eq!(
            links_storage(dir).path(),
            Path::new("/var/lib/sealnote/links.json")
        );
    }
}
