use crate::state::PageRecord;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};
use thiserror::Error;
use url::Url;

/// Errors raised by the page record store
///
/// Both variants mean the claim/dispatch protocol was broken upstream. Callers log them
/// and carry on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("A record already exists for {0}")]
    AlreadyExists(Url),

    #[error("No record exists for parent {0}")]
    MissingParent(Url),
}

/// Concurrency-safe map from canonical address to page record
///
/// The outer lock guards the set of records and is only taken for writing when a record
/// is created. Each record sits behind its own mutex, so `add_child` calls on different
/// parents run in parallel while calls on the same parent are serialized.
#[derive(Debug, Default)]
pub struct PageRecordStore {
    records: RwLock<HashMap<Url, Mutex<PageRecord>>>,
}

impl PageRecordStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the record for a freshly fetched page
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The record was created
    /// * `Err(RecordError::AlreadyExists)` - A record for this address exists; it is left
    ///   untouched
    pub fn create_record(&self, url: Url, data: Vec<String>) -> Result<(), RecordError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);

        if records.contains_key(&url) {
            return Err(RecordError::AlreadyExists(url));
        }

        let record = PageRecord::new(url.clone(), data);
        records.insert(url, Mutex::new(record));
        Ok(())
    }

    /// Appends a child address to a parent's record
    pub fn add_child(&self, parent: &Url, child: Url) -> Result<(), RecordError> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);

        let record = records
            .get(parent)
            .ok_or_else(|| RecordError::MissingParent(parent.clone()))?;

        record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .children
            .push(child);
        Ok(())
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies every record out of the store, ordered by address
    ///
    /// Only meaningful once the traversal has drained.
    pub fn snapshot(&self) -> Vec<PageRecord> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);

        let mut snapshot: Vec<PageRecord> = records
            .values()
            .map(|record| record.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect();

        snapshot.sort_by(|a, b| a.url.as_str().cmp(b.url.as_str()));
        snapshot
    }
}
