//! Named build hooks for fields with a `jsBuildFunction` property.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::form::FormMode;
use super::widget::FormElement;
use crate::table::{FieldDefinition, TableDefinition};

/// Arguments passed to a build hook.
#[derive(Debug, Clone, Copy)]
pub struct HookInput<'a> {
    pub table: &'a TableDefinition,
    pub field: &'a FieldDefinition,
    pub value: &'a Value,
    pub mode: FormMode,
}

/// A table-specific widget builder. Returning `None` renders nothing.
pub type BuildHook = Arc<dyn Fn(&HookInput<'_>) -> Option<FormElement> + Send + Sync>;

/// Build hooks keyed by the name used in `jsBuildFunction`.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, BuildHook>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(&HookInput<'_>) -> Option<FormElement> + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), Arc::new(hook));
    }

    pub fn get(&self, name: &str) -> Option<&BuildHook> {
        self.hooks.get(name)
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.hooks.keys().collect();
        names.sort();
        f.debug_struct("HookRegistry").field("hooks", &names).finish()
    }
}
