//! In-memory template store with built-in templates.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use trestle_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{TemplateBody, TemplateId},
    error::TrestleResult,
};

use crate::builtin_templates;

/// Thread-safe in-memory template store.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<RwLock<BTreeMap<TemplateId, TemplateBody>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a store with built-in templates loaded.
    pub fn with_builtin() -> TrestleResult<Self> {
        let store = Self::new();
        for template in builtin_templates::all_templates() {
            store.insert(template)?;
        }
        Ok(store)
    }

    /// Insert or replace a template.
    pub fn insert(&self, template: TemplateBody) -> TrestleResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(template.id.clone(), template);
        Ok(())
    }

    /// Get the number of templates.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore for InMemoryStore {
    fn get(&self, id: &TemplateId) -> TrestleResult<TemplateBody> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(id).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound { id: id.to_string() }.into()
        })
    }

    fn list(&self) -> TrestleResult<Vec<TemplateId>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_store_lists_every_body() {
        let store = InMemoryStore::with_builtin().unwrap();
        assert_eq!(store.len(), builtin_templates::count());
        assert!(store.get(&TemplateId::new("Gemfile")).is_ok());
    }

    #[test]
    fn insert_replaces_existing_body() {
        let store = InMemoryStore::new();
        store.insert(TemplateBody::new("Procfile", "a")).unwrap();
        store.insert(TemplateBody::new("Procfile", "b")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&TemplateId::new("Procfile")).unwrap().content, "b");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let err = InMemoryStore::new().get(&TemplateId::new("nope")).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
