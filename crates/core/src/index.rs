//! Deduplicating file index keyed by display name and content length.
//!
//! Two files with the same name and byte length are treated as the same indexed file.
//! The map is concurrent so parallel workers can share one index.

use crate::source::extension_of;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexRecord {
    pub id: Uuid,
    pub file_name: String,
    pub content_length: u64,
    pub extension: Option<String>,
}

/// Outcome of [`FileIndex::find_or_create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLookup {
    Existing(IndexRecord),
    Created(IndexRecord),
}

impl IndexLookup {
    pub fn record(&self) -> &IndexRecord {
        match self {
            IndexLookup::Existing(r) | IndexLookup::Created(r) => r,
        }
    }

    pub fn is_existing(&self) -> bool {
        matches!(self, IndexLookup::Existing(_))
    }
}

#[derive(Debug, Default)]
pub struct FileIndex {
    records: DashMap<(String, u64), IndexRecord>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `(file_name, content_length)`, creating it if absent.
    pub fn find_or_create(&self, file_name: &str, content_length: u64) -> IndexLookup {
        match self.records.entry((file_name.to_string(), content_length)) {
            Entry::Occupied(entry) => IndexLookup::Existing(entry.get().clone()),
            Entry::Vacant(entry) => {
                let record = IndexRecord {
                    id: Uuid::new_v4(),
                    file_name: file_name.to_string(),
                    content_length,
                    extension: extension_of(file_name),
                };
                entry.insert(record.clone());
                IndexLookup::Created(record)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
