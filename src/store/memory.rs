//! In-memory ledger backed by an ordered map.

use crate::error::StorageError;
use crate::store::selector::FilterQuery;
use crate::store::{LedgerStore, QueryResults};
use crate::types::KeyValue;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-memory implementation of [`LedgerStore`].
///
/// Values are kept as raw bytes under their key. Queries run against a snapshot taken
/// when the query starts, so writes made while draining results are not observed.
#[derive(Default)]
pub struct MemoryLedger {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl LedgerStore for MemoryLedger {
    fn get_state(&self, key: &str) -> Result<String, StorageError> {
        match self.entries.read().get(key) {
            Some(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            None => Ok(String::new()),
        }
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn query_by_filter(&self, document: &str) -> Result<QueryResults<'_>, StorageError> {
        let query = FilterQuery::parse(document)?;
        let matched: Vec<KeyValue> = self
            .entries
            .read()
            .iter()
            .map(|(key, bytes)| (key, String::from_utf8_lossy(bytes)))
            .filter(|(_, text)| query.matches_text(text))
            .map(|(key, text)| KeyValue::new(key.clone(), text.into_owned()))
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(Box::new(matched.into_iter().map(Ok)))
    }
}
