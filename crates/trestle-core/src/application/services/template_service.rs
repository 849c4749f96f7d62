//! Template Service - template listing and lookup.
//!
//! Separated from ScaffoldService for single responsibility.

use crate::{
    application::ports::TemplateStore,
    domain::{TemplateBody, TemplateId},
    error::TrestleResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub id: String,
    pub lines: usize,
    /// Whether the body contains `{{VARIABLE}}` placeholders.
    pub parameterized: bool,
}

/// Service for template operations.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Get a template by ID.
    pub fn get(&self, id: &TemplateId) -> TrestleResult<TemplateBody> {
        self.store.get(id)
    }

    /// List all templates with summary info.
    pub fn list(&self) -> TrestleResult<Vec<TemplateInfo>> {
        self.store
            .list()?
            .into_iter()
            .map(|id| {
                let body = self.store.get(&id)?;
                Ok(TemplateInfo {
                    id: id.to_string(),
                    lines: body.content.lines().count(),
                    parameterized: body.is_parameterized(),
                })
            })
            .collect()
    }
}
