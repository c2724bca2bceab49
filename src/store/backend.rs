#[cfg(test)]
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use super::StoreError;
use super::io;

/// Durable home of one serialized collection.
///
/// Collections are small, so every mutation rewrites the whole thing.
pub trait Storage {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the stored bytes with `apply(current)`. No other `update` on
    /// the same storage can interleave between the read and the write.
    fn update<R, F>(&self, apply: F) -> Result<R, StoreError>
    where
        F: FnOnce(Option<Vec<u8>>) -> Result<(Vec<u8>, R), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(io::read_bytes(&self.path)?)
    }

    fn update<R, F>(&self, apply: F) -> Result<R, StoreError>
    where
        F: FnOnce(Option<Vec<u8>>) -> Result<(Vec<u8>, R), StoreError>,
    {
        io::update_bytes_atomic(&self.path, apply)
    }
}

/// In-process storage for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    bytes: RefCell<Option<Vec<u8>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: RefCell::new(Some(bytes.into())),
        }
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.bytes.borrow().clone())
    }

    fn update<R, F>(&self, apply: F) -> Result<R, StoreError>
    where
        F: FnOnce(Option<Vec<u8>>) -> Result<(Vec<u8>, R), StoreError>,
    {
        let current = self.bytes.borrow().clone();
        let (bytes, outcome) = apply(current)?;
        *self.bytes.borrow_mut() = Some(bytes);
        Ok(outcome)
    }
}
