//! Saved drafts.
//!
//! Drafts are full [`DocumentRecord`] snapshots grouped by document type and kept
//! in one JSON blob under a fixed key. Saving appends; nothing is edited in place.
//! The `*_or_notice` helpers are the boundary the UI talks to: they never fail,
//! they log and hand back a short message instead.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use tracing::{info, warn};

use crate::db::Db;
use crate::error::DraftError;
use crate::types::{DocumentRecord, DocumentType, LineItem};

/// Opaque string storage keyed by name.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, DraftError>;
    fn put(&self, key: &str, value: &str) -> Result<(), DraftError>;
}

impl BlobStore for Db {
    fn get(&self, key: &str) -> Result<Option<String>, DraftError> {
        self.get_value(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), DraftError> {
        self.put_value(key, value)
    }
}

impl<T: BlobStore + ?Sized> BlobStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, DraftError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), DraftError> {
        (**self).put(key, value)
    }
}

/// Process-local store, used by tests and as a fallback when the database cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: RwLock<HashMap<String, String>>,
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, DraftError> {
        let guard = self.entries.read().map_err(|_| DraftError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), DraftError> {
        let mut guard = self.entries.write().map_err(|_| DraftError::Poisoned)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Serialized form: `{ "invoice": [..], "delivery-challan": [..], "quotation": [..] }`.
/// Unknown keys are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftBook {
    drafts: BTreeMap<String, Vec<DocumentRecord>>,
}

impl DraftBook {
    pub fn drafts(&self, doc_type: DocumentType) -> &[DocumentRecord] {
        self.drafts
            .get(doc_type.key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn append(&mut self, doc_type: DocumentType, record: DocumentRecord) -> usize {
        let list = self.drafts.entry(doc_type.key().to_string()).or_default();
        list.push(record);
        list.len()
    }

    pub fn latest(&self, doc_type: DocumentType) -> Option<&DocumentRecord> {
        self.drafts(doc_type).last()
    }
}

/// One line of the draft picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSummary {
    /// Position in the saved list (0 = oldest).
    pub index: usize,
    pub document_number: String,
    pub recipient: String,
    pub date: String,
    pub total: f64,
    pub item_count: usize,
}

/// Result of [`DraftStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedDraft {
    /// Drafts now stored for the type.
    pub count: usize,
    /// The stored blob was unreadable and every earlier draft was dropped.
    pub reset: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub saved: bool,
    /// Drafts now stored for the type (0 when saving failed).
    pub count: usize,
    pub notice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<DocumentRecord>,
    pub notice: String,
}

pub struct DraftStore<S: BlobStore> {
    store: S,
    key: String,
}

impl<S: BlobStore> DraftStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn read_book(&self) -> Result<DraftBook, DraftError> {
        match self.store.get(&self.key)? {
            None => Ok(DraftBook::default()),
            Some(blob) if blob.trim().is_empty() => Ok(DraftBook::default()),
            Some(blob) => serde_json::from_str(&blob).map_err(|source| DraftError::Corrupt {
                key: self.key.clone(),
                source,
            }),
        }
    }

    fn write_book(&self, book: &DraftBook) -> Result<(), DraftError> {
        let blob = serde_json::to_string(book).map_err(DraftError::Serialize)?;
        self.store.put(&self.key, &blob)
    }

    /// Append `record` to the drafts of `doc_type`.
    /// An unreadable blob is replaced by a fresh book, and the result says so.
    pub fn save(&self, doc_type: DocumentType, record: &DocumentRecord) -> Result<SavedDraft, DraftError> {
        let (mut book, reset) = match self.read_book() {
            Ok(book) => (book, false),
            Err(err @ DraftError::Corrupt { .. }) => {
                warn!(key = %self.key, error = %err, "replacing unreadable drafts");
                (DraftBook::default(), true)
            }
            Err(err) => return Err(err),
        };
        let count = book.append(doc_type, record.clone());
        self.write_book(&book)?;
        Ok(SavedDraft { count, reset })
    }

    pub fn load_latest(&self, doc_type: DocumentType) -> Result<Option<DocumentRecord>, DraftError> {
        let book = self.read_book()?;
        Ok(book.latest(doc_type).cloned().map(with_at_least_one_item))
    }

    /// Newest first.
    pub fn list(&self, doc_type: DocumentType) -> Result<Vec<DraftSummary>, DraftError> {
        let book = self.read_book()?;
        let summaries = book
            .drafts(doc_type)
            .iter()
            .enumerate()
            .rev()
            .map(|(index, record)| DraftSummary {
                index,
                document_number: record.document_number.clone(),
                recipient: record.recipient.clone(),
                date: record.date.clone(),
                total: record.total,
                item_count: record.line_items.len(),
            })
            .collect();
        Ok(summaries)
    }

    pub fn save_or_notice(&self, doc_type: DocumentType, record: &DocumentRecord) -> SaveOutcome {
        match self.save(doc_type, record) {
            Ok(SavedDraft { count, reset }) => {
                info!(document_type = doc_type.key(), count, reset, "draft saved");
                let mut notice = format!("{} draft saved.", doc_type.menu_label());
                if reset {
                    notice.push_str(" Saved drafts were unreadable and have been reset.");
                }
                SaveOutcome {
                    saved: true,
                    count,
                    notice,
                }
            }
            Err(err) => {
                warn!(document_type = doc_type.key(), error = %err, "saving draft failed");
                SaveOutcome {
                    saved: false,
                    count: 0,
                    notice: format!("Could not save draft: {}", err),
                }
            }
        }
    }

    pub fn load_latest_or_notice(&self, doc_type: DocumentType) -> LoadOutcome {
        match self.load_latest(doc_type) {
            Ok(Some(record)) => {
                info!(document_type = doc_type.key(), "draft restored");
                LoadOutcome {
                    record: Some(record),
                    notice: format!("Latest {} draft restored.", doc_type.menu_label()),
                }
            }
            Ok(None) => LoadOutcome {
                record: None,
                notice: format!("No saved {} drafts.", doc_type.menu_label()),
            },
            Err(err) => {
                warn!(document_type = doc_type.key(), error = %err, "loading drafts failed");
                LoadOutcome {
                    record: None,
                    notice: format!("Saved drafts are unavailable: {}", err),
                }
            }
        }
    }

    /// Silent variant for background listing: failures read as "no drafts".
    pub fn list_or_empty(&self, doc_type: DocumentType) -> Vec<DraftSummary> {
        self.list(doc_type).unwrap_or_else(|err| {
            warn!(document_type = doc_type.key(), error = %err, "listing drafts failed");
            Vec::new()
        })
    }
}

/// A hand-edited blob could hold a record without items; restore the one-item floor.
fn with_at_least_one_item(mut record: DocumentRecord) -> DocumentRecord {
    if record.line_items.is_empty() {
        record.line_items.push(LineItem::blank(1));
        record.subtotal = 0.0;
        record.total = record.delivery_cost - record.discount;
    }
    record
}
