use std::path::Path;

use tracing::debug;

use trestle_core::{
    application::ports::{BaseGenerator, Filesystem},
    domain::Configuration,
    error::TrestleResult,
};

/// Files a fresh `rails new` would leave that the scaffold pipeline edits.
const SKELETON: &[(&str, &str)] = &[
    (
        "config/environments/development.rb",
        "Rails.application.configure do\n  config.action_mailer.raise_delivery_errors = false\nend\n",
    ),
    (
        "config/environments/production.rb",
        "require \"active_support/core_ext/integer/time\"\n\nRails.application.configure do\n  config.action_mailer.perform_caching = false\nend\n",
    ),
    (
        "config/routes.rb",
        "Rails.application.routes.draw do\n  # Define your application routes per the DSL\n  # root \"articles#index\"\nend\n",
    ),
];

/// Writes a minimal Rails skeleton through a [`Filesystem`].
pub struct SkeletonGenerator<F> {
    filesystem: F,
}

impl<F: Filesystem> SkeletonGenerator<F> {
    pub fn new(filesystem: F) -> Self {
        Self { filesystem }
    }
}

impl<F: Filesystem> BaseGenerator for SkeletonGenerator<F> {
    fn create_project(&self, _config: &Configuration, root: &Path) -> TrestleResult<()> {
        self.filesystem.create_dir_all(root)?;
        for (relative, content) in SKELETON {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, content)?;
            debug!(path = %path.display(), "skeleton file");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "skeleton"
    }
}
