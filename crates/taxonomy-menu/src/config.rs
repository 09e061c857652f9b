//! Binding persistence
//!
//! Bindings and their link index live in one settings object keyed by
//! vocabulary. Writers read a binding, modify it and put it back; `save`
//! makes pending changes durable.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use dashmap::DashMap;

use crate::binding::{Settings, VocabularyBinding};
use crate::error::{Result, TaxonomyMenuError};
use crate::term::VocabularyId;

/// Storage for vocabulary bindings.
///
/// Failures are persistence errors and are never retried by callers.
pub trait BindingStore {
    /// Load the binding of `vocabulary`.
    fn binding(&self, vocabulary: &VocabularyId) -> Result<Option<VocabularyBinding>>;

    /// Insert or replace a binding.
    fn put_binding(&self, binding: VocabularyBinding) -> Result<()>;

    /// Delete the binding of `vocabulary`. Missing bindings are ignored.
    fn remove_binding(&self, vocabulary: &VocabularyId) -> Result<()>;

    /// Flush pending changes.
    fn save(&self) -> Result<()>;
}

/// In-memory binding store.
#[derive(Debug, Default)]
pub struct MemoryBindingStore {
    bindings: DashMap<VocabularyId, VocabularyBinding>,
    saves: AtomicUsize,
}

impl MemoryBindingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `save` was called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl BindingStore for MemoryBindingStore {
    fn binding(&self, vocabulary: &VocabularyId) -> Result<Option<VocabularyBinding>> {
        Ok(self.bindings.get(vocabulary).map(|b| b.value().clone()))
    }

    fn put_binding(&self, binding: VocabularyBinding) -> Result<()> {
        self.bindings.insert(binding.vocabulary_id.clone(), binding);
        Ok(())
    }

    fn remove_binding(&self, vocabulary: &VocabularyId) -> Result<()> {
        self.bindings.remove(vocabulary);
        Ok(())
    }

    fn save(&self) -> Result<()> {
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Settings kept in a JSON file.
///
/// Changes are held in memory until [`BindingStore::save`] writes the whole
/// settings object back. Writes go to a temporary sibling first and are
/// renamed over the target.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    settings: Mutex<Settings>,
}

impl JsonSettingsStore {
    /// Open the settings file at `path`. A missing file yields empty settings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), "opened taxonomy menu settings");
        Ok(Self {
            path,
            settings: Mutex::new(settings),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current in-memory settings.
    pub fn snapshot(&self) -> Result<Settings> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Settings>> {
        self.settings
            .lock()
            .map_err(|_| TaxonomyMenuError::Storage("settings lock poisoned".to_string()))
    }
}

impl BindingStore for JsonSettingsStore {
    fn binding(&self, vocabulary: &VocabularyId) -> Result<Option<VocabularyBinding>> {
        Ok(self.lock()?.menu_list.get(vocabulary).cloned())
    }

    fn put_binding(&self, binding: VocabularyBinding) -> Result<()> {
        self.lock()?
            .menu_list
            .insert(binding.vocabulary_id.clone(), binding);
        Ok(())
    }

    fn remove_binding(&self, vocabulary: &VocabularyId) -> Result<()> {
        self.lock()?.menu_list.shift_remove(vocabulary);
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&*self.lock()?)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
