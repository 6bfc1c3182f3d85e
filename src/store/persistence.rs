//! Persistence layer for the ledger

use crate::error::StorageError;
use crate::store::selector::FilterQuery;
use crate::store::{paginate, LedgerStore, QueryResults};
use crate::types::KeyValue;
use std::path::Path;

/// Sled-based implementation of [`LedgerStore`]
///
/// Keys are the UTF-8 record keys; values are the serialized record bytes exactly as
/// written by the caller.
pub struct SledLedger {
    db: sled::Db,
}

impl SledLedger {
    /// Create a new SledLedger at the given path
    ///
    /// The path can be a directory (sled will create a database there) or
    /// a file path (sled will use it as the database file).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)
            .map_err(|e| StorageError::backend("Failed to open sled database", e))?;
        Ok(Self { db })
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db
            .flush()
            .map_err(|e| StorageError::backend("Failed to flush database", e))?;
        Ok(())
    }
}

impl LedgerStore for SledLedger {
    fn get_state(&self, key: &str) -> Result<String, StorageError> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| StorageError::backend("Failed to get state", e))?
        {
            Some(value) => Ok(String::from_utf8_lossy(&value).into_owned()),
            None => Ok(String::new()),
        }
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.db
            .insert(key.as_bytes(), value)
            .map_err(|e| StorageError::backend("Failed to put state", e))?;
        Ok(())
    }

    fn query_by_filter(&self, document: &str) -> Result<QueryResults<'_>, StorageError> {
        let query = FilterQuery::parse(document)?;
        let (skip, limit) = (query.skip, query.limit);

        // Lazy scan in key order; sled iterates keys lexicographically.
        let rows = self.db.iter().filter_map(move |item| match item {
            Ok((key, value)) => {
                let text = String::from_utf8_lossy(&value);
                if query.matches_text(&text) {
                    Some(Ok(KeyValue::new(
                        String::from_utf8_lossy(&key).into_owned(),
                        text.into_owned(),
                    )))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(StorageError::backend("Failed to iterate store", e))),
        });
        Ok(paginate(rows, skip, limit))
    }

    fn sync(&self) -> Result<(), StorageError> {
        self.flush()
    }
}
