//! Ledger Store
//!
//! Boundary to the key-value/document store that owns persisted employee bytes, plus
//! the typed accessor the operation handlers use on top of it.

pub mod memory;
pub mod persistence;
pub mod selector;

pub use memory::MemoryLedger;
pub use persistence::SledLedger;

use crate::error::{OperationError, StorageError};
use crate::types::{Employee, KeyValue};
use crate::validate::validate_non_empty;
use tracing::debug;

/// Single-pass result sequence of a rich query.
pub type QueryResults<'a> = Box<dyn Iterator<Item = Result<KeyValue, StorageError>> + 'a>;

/// Apply `skip`/`limit` to the successful rows of a fallible scan.
///
/// Errors are always yielded and never count against either bound. The scan stops
/// pulling rows once `limit` matches have been produced.
pub fn paginate<'a, I>(rows: I, skip: usize, limit: Option<usize>) -> QueryResults<'a>
where
    I: Iterator<Item = Result<KeyValue, StorageError>> + 'a,
{
    let mut rows = rows;
    let limit = limit.unwrap_or(usize::MAX);
    let mut skipped = 0;
    let mut taken = 0;
    Box::new(std::iter::from_fn(move || {
        if taken >= limit {
            return None;
        }
        loop {
            match rows.next()? {
                Err(e) => return Some(Err(e)),
                Ok(_) if skipped < skip => skipped += 1,
                Ok(row) => {
                    taken += 1;
                    return Some(Ok(row));
                }
            }
        }
    }))
}

/// Store interface
///
/// `get_state` returns an empty string for an absent key; there is no separate
/// "not found" signal at this layer.
pub trait LedgerStore {
    fn get_state(&self, key: &str) -> Result<String, StorageError>;

    /// Unconditional overwrite.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Execute a filter document, yielding matches in key order.
    fn query_by_filter(&self, document: &str) -> Result<QueryResults<'_>, StorageError>;

    /// Make accepted writes durable. No-op for volatile backends.
    fn sync(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Typed, existence-checked access to employee records.
pub struct RecordAccessor<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> RecordAccessor<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// A key exists iff its stored value is non-blank.
    pub fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let value = self.store.get_state(key)?;
        Ok(validate_non_empty(Some(value.as_str())))
    }

    /// Write `record` under `key` unless the key is already occupied.
    ///
    /// One read, then at most one write.
    pub fn create(&self, key: &str, record: &Employee) -> Result<(), OperationError> {
        if self.exists(key)? {
            debug!(key, "create rejected, key occupied");
            return Err(OperationError::AlreadyExists(key.to_string()));
        }
        let bytes = record.to_bytes()?;
        self.store.put_state(key, &bytes)?;
        Ok(())
    }

    /// Read and decode the record stored under `key`.
    pub fn read_one(&self, key: &str) -> Result<Employee, OperationError> {
        let value = self.store.get_state(key)?;
        if !validate_non_empty(Some(value.as_str())) {
            return Err(OperationError::NotFound(key.to_string()));
        }
        Employee::from_json(&value).map_err(|e| {
            OperationError::Serialization(format!(
                "stored value for {} is not an employee record: {}",
                key, e
            ))
        })
    }
}
