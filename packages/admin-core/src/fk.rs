//! Foreign key option lists: cache, supersession and select state.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::AdminError;
use crate::render::ValidationTag;
use crate::table::{FieldDefinition, TableDefinition};

/// Cache key: `(table, field, other table, other field)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FkKey {
    pub table: String,
    pub field: String,
    pub other_table: String,
    pub other_field: String,
}

impl FkKey {
    /// Key for a field's foreign key, if it declares one.
    pub fn for_field(table: &TableDefinition, field: &FieldDefinition) -> Option<Self> {
        let fk = field.foreign_key.as_ref()?;
        Some(Self {
            table: table.name.clone(),
            field: field.name.clone(),
            other_table: fk.other_table.clone(),
            other_field: fk.other_field.clone(),
        })
    }
}

impl fmt::Display for FkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}__{}_{}",
            self.table, self.field, self.other_table, self.other_field
        )
    }
}

/// One selectable row of the referenced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FkOption {
    pub id: String,
    #[serde(rename = "val")]
    pub label: String,
}

impl FkOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Result of resolving a key through the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum FkFetchOutcome {
    /// Options from the cache or a completed fetch
    Resolved(Arc<Vec<FkOption>>),
    /// A newer fetch for the same key started while this one ran; its
    /// result was dropped
    Superseded,
}

#[derive(Debug, Default)]
struct CacheEntry {
    generation: u64,
    options: Option<Arc<Vec<FkOption>>>,
}

/// Option lists cached per [`FkKey`].
///
/// Every fetch takes a generation number for its key. Only the fetch holding
/// the latest generation may populate the entry, so a refresh started while
/// an older fetch is in flight supersedes it instead of racing it.
#[derive(Debug, Default)]
pub struct FkOptionCache {
    entries: RwLock<HashMap<FkKey, CacheEntry>>,
}

impl FkOptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached options, if resolved.
    pub fn get(&self, key: &FkKey) -> Option<Arc<Vec<FkOption>>> {
        self.entries.read().get(key).and_then(|e| e.options.clone())
    }

    /// Returns cached options or fetches them.
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `fetch` - Produces the option list when the key is not cached
    ///
    /// # Returns
    /// The options, [`FkFetchOutcome::Superseded`] when a newer fetch took
    /// over, or the fetch error. A failed fetch leaves no entry behind.
    pub async fn resolve<F, Fut>(&self, key: &FkKey, fetch: F) -> Result<FkFetchOutcome, AdminError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<FkOption>, AdminError>>,
    {
        if let Some(options) = self.get(key) {
            return Ok(FkFetchOutcome::Resolved(options));
        }
        self.fetch_into(key, fetch).await
    }

    /// Drops any cached list and fetches a new one, superseding fetches
    /// already in flight for the key.
    pub async fn refresh<F, Fut>(&self, key: &FkKey, fetch: F) -> Result<FkFetchOutcome, AdminError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<FkOption>, AdminError>>,
    {
        self.fetch_into(key, fetch).await
    }

    /// Drops the cached list for a key.
    pub fn invalidate(&self, key: &FkKey) {
        if let Some(entry) = self.entries.write().get_mut(key) {
            entry.options = None;
        }
    }

    /// Drops the cached lists of every key referencing `other_table`.
    pub fn invalidate_table(&self, other_table: &str) {
        for (key, entry) in self.entries.write().iter_mut() {
            if key.other_table == other_table {
                entry.options = None;
            }
        }
    }

    /// Drops every cached list.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn begin_fetch(&self, key: &FkKey) -> u64 {
        let mut entries = self.entries.write();
        let entry = entries.entry(key.clone()).or_default();
        entry.generation += 1;
        entry.options = None;
        entry.generation
    }

    async fn fetch_into<F, Fut>(&self, key: &FkKey, fetch: F) -> Result<FkFetchOutcome, AdminError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<FkOption>, AdminError>>,
    {
        let generation = self.begin_fetch(key);
        tracing::debug!("Fetching options for {} (generation {})", key, generation);

        let result = fetch().await;

        let mut entries = self.entries.write();
        let current = entries.get(key).map(|e| e.generation);
        if current != Some(generation) {
            tracing::debug!("Dropping superseded options for {}", key);
            return Ok(FkFetchOutcome::Superseded);
        }

        match result {
            Ok(options) => {
                let options = Arc::new(options);
                if let Some(entry) = entries.get_mut(key) {
                    entry.options = Some(Arc::clone(&options));
                }
                Ok(FkFetchOutcome::Resolved(options))
            }
            Err(e) => {
                entries.remove(key);
                tracing::error!("Failed to fetch options for {}: {}", key, e);
                Err(e)
            }
        }
    }
}

/// Option list state of a foreign key select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FkSelectState {
    /// Placeholder shown until the options resolve
    Loading,
    /// Resolved options
    Ready(Vec<FkOption>),
}

/// Foreign key select control.
#[derive(Debug, Clone, PartialEq)]
pub struct FkSelect {
    pub key: FkKey,
    pub name: String,
    /// Selected id; set only while the options contain [`FkSelect::requested`]
    pub selected: Option<String>,
    /// Id the control was rendered with
    pub requested: Option<String>,
    /// Leading empty option for nullable fields
    pub include_empty: bool,
    pub tags: Vec<ValidationTag>,
    pub state: FkSelectState,
}

impl FkSelect {
    pub fn loading(key: FkKey, name: impl Into<String>, selected: Option<String>, include_empty: bool) -> Self {
        Self {
            key,
            name: name.into(),
            requested: selected.clone(),
            selected,
            include_empty,
            tags: Vec::new(),
            state: FkSelectState::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == FkSelectState::Loading
    }

    /// Replaces the option set. The requested id is selected whenever the
    /// new set contains it, including after a refresh that had dropped it.
    pub fn apply_options(&mut self, options: &[FkOption]) {
        self.selected = self
            .requested
            .clone()
            .filter(|id| options.iter().any(|o| &o.id == id));
        self.state = FkSelectState::Ready(options.to_vec());
    }
}
