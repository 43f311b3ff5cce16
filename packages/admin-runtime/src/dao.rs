//! Table data access: the DAO interface and its in-memory implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use admin_core::error::AdminError;
use admin_core::query::{Condition, Query};
use admin_core::record::{is_blank, value_as_f64, value_text};
use admin_core::registry::TableRegistry;
use admin_core::Record;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

use crate::Result;

/// Data access for one table. Records are keyed by the text of their
/// primary key.
pub trait TableDao: Send + Sync {
    /// Table served by this DAO
    fn table(&self) -> &str;
    fn get_all(&self) -> Result<Vec<Record>>;
    fn get_where(&self, query: &Query) -> Result<Vec<Record>>;
    fn count_all(&self) -> Result<usize>;
    fn count_where(&self, conditions: &[Condition]) -> Result<usize>;
    fn get(&self, id: &str) -> Result<Record>;
    /// Inserts a record, assigning a primary key when it has none.
    /// Returns the stored record.
    fn insert(&self, record: Record) -> Result<Record>;
    /// Overwrites the given fields of an existing record. Returns the
    /// stored record.
    fn update(&self, id: &str, values: Record) -> Result<Record>;
    fn delete(&self, id: &str) -> Result<()>;
}

/// In-memory table kept in insertion order.
#[derive(Debug)]
pub struct MemoryDao {
    table: String,
    primary_key: String,
    rows: RwLock<IndexMap<String, Record>>,
    next_id: AtomicU64,
}

impl MemoryDao {
    pub fn new(table: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
            rows: RwLock::new(IndexMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn not_found(&self, id: &str) -> AdminError {
        AdminError::RecordNotFound {
            table: self.table.clone(),
            id: id.to_string(),
        }
    }

    /// Keeps generated ids above any explicit numeric key.
    fn observe_id(&self, id: &Value) {
        if let Some(n) = value_as_f64(id).filter(|n| *n >= 0.0 && n.fract() == 0.0) {
            self.next_id.fetch_max(n as u64 + 1, Ordering::Relaxed);
        }
    }
}

impl TableDao for MemoryDao {
    fn table(&self) -> &str {
        &self.table
    }

    fn get_all(&self) -> Result<Vec<Record>> {
        Ok(self.rows.read().values().cloned().collect())
    }

    fn get_where(&self, query: &Query) -> Result<Vec<Record>> {
        let rows = self.rows.read();
        Ok(query.apply(rows.values().cloned()))
    }

    fn count_all(&self) -> Result<usize> {
        Ok(self.rows.read().len())
    }

    fn count_where(&self, conditions: &[Condition]) -> Result<usize> {
        let rows = self.rows.read();
        Ok(rows
            .values()
            .filter(|r| conditions.iter().all(|c| c.matches(r)))
            .count())
    }

    fn get(&self, id: &str) -> Result<Record> {
        self.rows
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    fn insert(&self, mut record: Record) -> Result<Record> {
        let mut rows = self.rows.write();
        let id = match record.get(&self.primary_key).filter(|v| !is_blank(v)) {
            Some(id) => {
                self.observe_id(id);
                value_text(id)
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                record.insert(self.primary_key.clone(), Value::from(id));
                id.to_string()
            }
        };
        if rows.contains_key(&id) {
            return Err(AdminError::Validation(format!(
                "duplicate {} '{}' in table '{}'",
                self.primary_key, id, self.table
            )));
        }
        rows.insert(id, record.clone());
        Ok(record)
    }

    fn update(&self, id: &str, values: Record) -> Result<Record> {
        let mut rows = self.rows.write();
        let row = rows.get_mut(id).ok_or_else(|| self.not_found(id))?;
        for (field, value) in values {
            // The key is immutable through update
            if field == self.primary_key {
                continue;
            }
            row.insert(field, value);
        }
        Ok(row.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.rows
            .write()
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| self.not_found(id))
    }
}

/// DAOs by table name.
#[derive(Clone, Default)]
pub struct DaoRegistry {
    daos: HashMap<String, Arc<dyn TableDao>>,
}

impl std::fmt::Debug for DaoRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaoRegistry")
            .field("tables", &self.daos.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DaoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty in-memory DAO per registered table.
    pub fn in_memory(registry: &TableRegistry) -> Self {
        let mut daos = Self::new();
        for table in registry.tables() {
            daos.register(Arc::new(MemoryDao::new(
                table.name.clone(),
                table.primary_key.clone(),
            )));
        }
        daos
    }

    /// Registers a DAO, replacing any previous one for the same table.
    pub fn register(&mut self, dao: Arc<dyn TableDao>) {
        self.daos.insert(dao.table().to_string(), dao);
    }

    pub fn get(&self, table: &str) -> Result<&Arc<dyn TableDao>> {
        self.daos.get(table).ok_or_else(|| AdminError::TableNotFound {
            table: table.to_string(),
        })
    }

    /// Loads seed rows from `{"Table": [{...}, ...], ...}`.
    ///
    /// # Returns
    /// Number of inserted records.
    pub fn seed_from_json(&self, json: &str) -> Result<usize> {
        let seed: IndexMap<String, Vec<Record>> = serde_json::from_str(json)?;
        let mut inserted = 0;
        for (table, records) in seed {
            let dao = self.get(&table)?;
            for record in records {
                dao.insert(record)?;
                inserted += 1;
            }
            tracing::debug!("Seeded table {}", table);
        }
        Ok(inserted)
    }
}
