//! Per-request context handed to every handler.

use std::sync::Arc;

use admin_core::config::AdminConfig;
use admin_core::error::AdminError;
use admin_core::i18n::Localizer;
use admin_core::registry::TableRegistry;

/// Who is asking, in which language, against which schema.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: Option<String>,
    /// Localizer switched to the request language
    pub localizer: Localizer,
    pub registry: Arc<TableRegistry>,
    pub config: Arc<AdminConfig>,
}

impl RequestContext {
    /// Builds the context, refusing anonymous requests when authentication
    /// is required.
    pub fn new(
        user: Option<String>,
        language: Option<&str>,
        localizer: &Localizer,
        registry: Arc<TableRegistry>,
        config: Arc<AdminConfig>,
    ) -> Result<Self, AdminError> {
        if config.require_auth && user.as_deref().map_or(true, str::is_empty) {
            return Err(AdminError::Unauthenticated);
        }
        let localizer = match language {
            Some(lang) => localizer.with_language(lang),
            None => localizer.clone(),
        };
        Ok(Self {
            user,
            localizer,
            registry,
            config,
        })
    }

    /// Translated message, or `default` when the dictionaries lack `key`.
    pub fn message(&self, key: &str, default: &str) -> String {
        self.localizer.get(key).unwrap_or(default).to_string()
    }
}
