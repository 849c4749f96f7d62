//! Built-in template bodies.
//!
//! Every body under `templates/` in this crate is compiled into the binary,
//! keyed by its path relative to that directory. A local directory can
//! override individual bodies; see [`templates_dir_override`].
//!
//! # Template resolution order
//!
//! 1. **`$TRESTLE_TEMPLATES_DIR`**, when set and the directory exists.
//! 2. **`templates.local_path`** from the config file (passed in by the CLI).
//! 3. The built-in bodies below.
//!
//! A directory only needs to contain the bodies it changes; everything else
//! falls through to the built-in set.

use std::path::PathBuf;

use tracing::{debug, warn};

use trestle_core::domain::TemplateBody;

/// Environment variable naming a template override directory.
pub const TEMPLATES_DIR_ENV: &str = "TRESTLE_TEMPLATES_DIR";

macro_rules! builtin {
    ($id:literal) => {
        (
            $id,
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $id)),
        )
    };
}

const BUILTIN: &[(&str, &str)] = &[
    builtin!("Gemfile"),
    builtin!("Procfile"),
    builtin!("README.md"),
    builtin!("bin/setup"),
    builtin!("config/environments/staging.rb"),
    builtin!("config/initializers/active_job.rb"),
    builtin!("config/initializers/json_encoding.rb"),
    builtin!("config/postgresql.yml"),
    builtin!("config/puma.rb"),
    builtin!("config/secrets.yml"),
    builtin!("config/smtp.rb"),
    builtin!("editorconfig"),
    builtin!("env.example"),
    builtin!("github/PULL_REQUEST_TEMPLATE.md"),
    builtin!("gitignore"),
    builtin!("javascript/packs/application.js"),
    builtin!("javascripts/application.js"),
    builtin!("lib/tasks/bundler_audit.rake"),
    builtin!("public/404.html"),
    builtin!("public/422.html"),
    builtin!("public/500.html"),
    builtin!("rspec"),
    builtin!("rubocop.yml"),
    builtin!("ruby-version"),
    builtin!("spec/rails_helper.rb"),
    builtin!("spec/spec_helper.rb"),
    builtin!("spec/support/database_cleaner.rb"),
    builtin!("stylesheets/application.scss"),
    builtin!("stylesheets/bootstrap.scss"),
    builtin!("stylesheets/bourbon_n_friends.scss"),
    builtin!("stylesheets/foundation.scss"),
    builtin!("views/_analytics.html.erb"),
    builtin!("views/_flashes.html.erb"),
    builtin!("views/_javascript.html.erb"),
    builtin!("views/application.html.erb"),
];

// ── Public API ────────────────────────────────────────────────────────────────

/// All built-in bodies, sorted by id.
pub fn all_templates() -> Vec<TemplateBody> {
    BUILTIN
        .iter()
        .map(|(id, content)| TemplateBody::new(*id, *content))
        .collect()
}

/// Number of bodies compiled in.
pub fn count() -> usize {
    BUILTIN.len()
}

/// Resolve the override directory: `$TRESTLE_TEMPLATES_DIR` first, then
/// `configured` (the config file's `templates.local_path`).
///
/// Paths that do not exist are ignored with a warning.
pub fn templates_dir_override(configured: Option<PathBuf>) -> Option<PathBuf> {
    let from_env = std::env::var_os(TEMPLATES_DIR_ENV).map(PathBuf::from);

    for (source, candidate) in [("env", from_env), ("config", configured)] {
        let Some(path) = candidate else { continue };
        if path.is_dir() {
            debug!(source, path = %path.display(), "using template override directory");
            return Some(path);
        }
        warn!(source, path = %path.display(), "template override directory does not exist, ignoring");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sorted_and_unique() {
        let ids: Vec<_> = BUILTIN.iter().map(|(id, _)| *id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn smtp_template_reads_provider_credentials() {
        let smtp = all_templates()
            .into_iter()
            .find(|t| t.id.as_str() == "config/smtp.rb")
            .unwrap();
        assert!(smtp.content.contains("SENDGRID_USERNAME"));
        assert!(smtp.content.contains("port: \"587\""));
    }

    #[test]
    fn no_body_is_empty() {
        assert!(all_templates().iter().all(|t| !t.content.trim().is_empty()));
    }
}
