//! Template store backed by a local directory.
//!
//! Bodies are addressed by their path relative to the root, with `/`
//! separators on every platform. Ids missing from the directory are looked
//! up in the fallback store, if any.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use trestle_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{TemplateBody, TemplateId},
    error::TrestleResult,
};

pub struct DirectoryStore {
    root: PathBuf,
    fallback: Option<Box<dyn TemplateStore>>,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback: None,
        }
    }

    /// Consult `fallback` for ids this directory does not provide.
    pub fn with_fallback(mut self, fallback: Box<dyn TemplateStore>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn local_ids(&self) -> TrestleResult<Vec<TemplateId>> {
        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: self.root.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                let id = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                ids.push(TemplateId::new(id));
            }
        }
        Ok(ids)
    }
}

impl TemplateStore for DirectoryStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn get(&self, id: &TemplateId) -> TrestleResult<TemplateBody> {
        let path = self.root.join(id.as_str());
        if path.is_file() {
            debug!(path = %path.display(), "template from local directory");
            let content = fs::read_to_string(&path).map_err(|e| {
                ApplicationError::FilesystemError {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?;
            return Ok(TemplateBody::new(id.clone(), content));
        }

        match &self.fallback {
            Some(fallback) => fallback.get(id),
            None => Err(ApplicationError::TemplateNotFound { id: id.to_string() }.into()),
        }
    }

    fn list(&self) -> TrestleResult<Vec<TemplateId>> {
        let mut ids: BTreeSet<TemplateId> = self.local_ids()?.into_iter().collect();
        if let Some(fallback) = &self.fallback {
            ids.extend(fallback.list()?);
        }
        Ok(ids.into_iter().collect())
    }
}
