//! Creator-local ledger of shared notes, most recent first.
//!
//! Purely informational: opening a note never consults it, and removing an
//! entry does not revoke the link.

use tracing::debug;

use super::{Storage, StoreError, load_or_default, modify};
use crate::note::ShareRecord;

pub struct ShareRecordStore<S> {
    storage: S,
}

impl<S: Storage> ShareRecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn append(&self, record: ShareRecord) -> Result<(), StoreError> {
        debug!(id = %record.id, "appending share record");
        modify(&self.storage, |records: &mut Vec<ShareRecord>| {
            records.insert(0, record);
            Ok(())
        })
    }

    pub fn list(&self) -> Result<Vec<ShareRecord>, StoreError> {
        load_or_default(&self.storage)
    }
}
