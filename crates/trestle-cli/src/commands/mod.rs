//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments into core calls and render results.
//! Adapter wiring shared by several commands lives here.

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod new;
pub mod setup;
pub mod smtp;

use tracing::debug;

use trestle_adapters::{DirectoryStore, InMemoryStore, builtin_templates};
use trestle_core::application::ports::TemplateStore;

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Built-in templates, overlaid by `$TRESTLE_TEMPLATES_DIR` or
/// `templates.local_path` when either names an existing directory.
pub(crate) fn template_store(config: &AppConfig) -> CliResult<Box<dyn TemplateStore>> {
    let builtin = InMemoryStore::with_builtin().map_err(CliError::Core)?;

    match builtin_templates::templates_dir_override(config.templates.local_path.clone()) {
        Some(dir) => {
            debug!(dir = %dir.display(), "Overlaying local templates");
            Ok(Box::new(DirectoryStore::new(dir).with_fallback(Box::new(builtin))))
        }
        None => Ok(Box::new(builtin)),
    }
}
