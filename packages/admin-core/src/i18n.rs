//! Localization dictionaries with key echo fallback.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::AdminError;

type Dictionary = HashMap<String, String>;

/// Localization lookup over per-language dictionaries.
///
/// Cloning is cheap; clones share the dictionaries and differ only in the
/// active language.
#[derive(Debug, Clone)]
pub struct Localizer {
    dictionaries: Arc<HashMap<String, Dictionary>>,
    language: String,
    default_language: String,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new("en")
    }
}

impl Localizer {
    /// Creates a localizer with no entries.
    pub fn new(default_language: impl Into<String>) -> Self {
        let default_language = default_language.into();
        Self {
            dictionaries: Arc::new(HashMap::new()),
            language: default_language.clone(),
            default_language,
        }
    }

    /// Creates a localizer from dictionaries keyed by language.
    pub fn from_dictionaries(
        default_language: impl Into<String>,
        dictionaries: HashMap<String, HashMap<String, String>>,
    ) -> Self {
        let default_language = default_language.into();
        Self {
            dictionaries: Arc::new(dictionaries),
            language: default_language.clone(),
            default_language,
        }
    }

    /// Parses a JSON document of the form `{"en": {"key": "text"}, ...}`.
    pub fn from_json(default_language: impl Into<String>, json: &str) -> Result<Self, AdminError> {
        let dictionaries: HashMap<String, Dictionary> = serde_json::from_str(json)?;
        Ok(Self::from_dictionaries(default_language, dictionaries))
    }

    /// Reads a JSON dictionary file.
    pub fn load(default_language: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, AdminError> {
        let path = path.as_ref();
        let localizer = Self::from_json(default_language, &fs::read_to_string(path)?)?;
        tracing::info!(
            "Loaded {} language dictionaries from {}",
            localizer.dictionaries.len(),
            path.display()
        );
        Ok(localizer)
    }

    /// Same dictionaries with another active language.
    pub fn with_language(&self, language: impl Into<String>) -> Self {
        Self {
            dictionaries: Arc::clone(&self.dictionaries),
            language: language.into(),
            default_language: self.default_language.clone(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Translation in the active language, then the default language.
    pub fn get(&self, key: &str) -> Option<&str> {
        [&self.language, &self.default_language]
            .into_iter()
            .filter_map(|lang| self.dictionaries.get(lang.as_str()))
            .find_map(|dict| dict.get(key))
            .map(String::as_str)
    }

    /// Translation of `key`, or `key` itself when none exists.
    pub fn lookup(&self, key: &str) -> String {
        self.get(key).unwrap_or(key).to_string()
    }

    /// Field label entry `Tbl_{table}_{field}`.
    pub fn field_label(&self, table: &str, field: &str) -> String {
        self.lookup(&format!("Tbl_{}_{}", table, field))
    }

    /// Field help entry `Tbl_{table}_{field}__help`, only when translated.
    pub fn field_help(&self, table: &str, field: &str) -> Option<String> {
        let key = format!("Tbl_{}_{}__help", table, field);
        let text = self.lookup(&key);
        (text != key).then_some(text)
    }
}
