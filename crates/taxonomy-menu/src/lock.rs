//! Per-vocabulary serialization of bulk operations

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use crate::error::{Result, TaxonomyMenuError};
use crate::term::VocabularyId;

/// One mutex per vocabulary.
///
/// Bulk generation and bulk removal read-modify-write the same link index;
/// running them under the vocabulary's lock keeps two administrators from
/// interleaving on one vocabulary. Different vocabularies do not contend.
#[derive(Debug, Default)]
pub struct VocabularyLocks {
    locks: DashMap<VocabularyId, Arc<Mutex<()>>>,
}

impl VocabularyLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock of `vocabulary`.
    pub fn with_lock<R>(&self, vocabulary: &VocabularyId, f: impl FnOnce() -> R) -> Result<R> {
        // Clone the Arc out so the map shard is not held while `f` runs.
        let lock = self
            .locks
            .entry(vocabulary.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock
            .lock()
            .map_err(|_| TaxonomyMenuError::LockPoisoned(vocabulary.clone()))?;
        Ok(f())
    }

    /// Number of vocabularies that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no vocabulary has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
