//! Run configuration: raw options in, immutable [`Configuration`] out.
//!
//! [`ScaffoldOptions`] is the loosely typed surface the CLI fills from flags
//! and config-file defaults. [`Configuration::from_options`] applies
//! defaults, aliases and validation once; everything downstream only reads
//! the result.

use serde::Serialize;

use crate::domain::{
    entities::template::RenderContext,
    error::DomainError,
    value_objects::{Choice, CssFramework, Database},
};

/// Ruby version written to `.ruby-version` and the Gemfile.
pub const DEFAULT_RUBY_VERSION: &str = "3.3.0";

/// Raw, unvalidated scaffold options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOptions {
    pub app_name: String,
    pub database: String,
    pub skip_deploy_provisioning: bool,
    pub deploy_flags: String,
    pub code_host_repo: Option<String>,
    pub git_remote_origin: Option<String>,
    pub css_framework: Option<String>,
    pub skip_legacy_test_framework: bool,
    pub skip_vcs: bool,
    pub webpack: bool,
}

impl ScaffoldOptions {
    /// Options with every documented default applied.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            database: Database::default().as_str().to_string(),
            skip_deploy_provisioning: false,
            deploy_flags: String::new(),
            code_host_repo: None,
            git_remote_origin: None,
            css_framework: None,
            skip_legacy_test_framework: true,
            skip_vcs: false,
            webpack: false,
        }
    }
}

/// An external tool the configuration needs before any step may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredTool {
    pub name: &'static str,
    pub reason: &'static str,
}

/// Resolved, immutable scaffold options for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    app_name: String,
    database: Choice<Database>,
    skip_deploy_provisioning: bool,
    deploy_flags: String,
    code_host_repo: Option<String>,
    git_remote_origin: Option<String>,
    css_framework: Option<Choice<CssFramework>>,
    skip_legacy_test_framework: bool,
    skip_vcs: bool,
    webpack: bool,
}

impl Configuration {
    pub fn from_options(options: ScaffoldOptions) -> Result<Self, DomainError> {
        validate_app_name(&options.app_name)?;

        let database = match options.database.trim() {
            "" => Choice::Known(Database::default()),
            raw => Choice::parse(raw),
        };

        let css_framework = options
            .css_framework
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty() && !raw.eq_ignore_ascii_case("none"))
            .map(Choice::parse);

        let deploy_flags = options.deploy_flags.trim().to_string();
        shell_words::split(&deploy_flags).map_err(|e| DomainError::InvalidOption {
            option: "deploy_flags",
            reason: e.to_string(),
        })?;

        Ok(Self {
            app_name: options.app_name,
            database,
            skip_deploy_provisioning: options.skip_deploy_provisioning,
            deploy_flags,
            code_host_repo: non_empty(options.code_host_repo),
            git_remote_origin: non_empty(options.git_remote_origin),
            css_framework,
            skip_legacy_test_framework: options.skip_legacy_test_framework,
            skip_vcs: options.skip_vcs,
            webpack: options.webpack,
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn database(&self) -> &Choice<Database> {
        &self.database
    }

    pub fn skip_deploy_provisioning(&self) -> bool {
        self.skip_deploy_provisioning
    }

    pub fn deploy_flags(&self) -> &str {
        &self.deploy_flags
    }

    pub fn code_host_repo(&self) -> Option<&str> {
        self.code_host_repo.as_deref()
    }

    pub fn git_remote_origin(&self) -> Option<&str> {
        self.git_remote_origin.as_deref()
    }

    pub fn css_framework(&self) -> Option<&Choice<CssFramework>> {
        self.css_framework.as_ref()
    }

    pub fn skip_legacy_test_framework(&self) -> bool {
        self.skip_legacy_test_framework
    }

    pub fn skip_vcs(&self) -> bool {
        self.skip_vcs
    }

    pub fn webpack(&self) -> bool {
        self.webpack
    }

    /// Tools that must be on the host before the pipeline starts.
    pub fn required_tools(&self) -> Vec<RequiredTool> {
        let mut tools = Vec::new();
        if self.webpack {
            tools.push(RequiredTool {
                name: "yarn",
                reason: "yarn is required in order to use webpack",
            });
        }
        if !self.skip_vcs {
            tools.push(RequiredTool {
                name: "git",
                reason: "git is required unless --skip-git is given",
            });
            if self.code_host_repo.is_some() {
                tools.push(RequiredTool {
                    name: "hub",
                    reason: "hub is required to create the code host repository",
                });
            }
        }
        if !self.skip_deploy_provisioning {
            tools.push(RequiredTool {
                name: "heroku",
                reason: "the heroku CLI is required unless --skip-deploy is given",
            });
        }
        tools
    }

    /// Substitution context shared by every render and command argument.
    pub fn render_context(&self) -> RenderContext {
        let ctx = RenderContext::new(&self.app_name);
        let kebab = ctx.get("APP_NAME_KEBAB").unwrap_or_default().to_string();

        ctx.with_variable("DATABASE", self.database.key())
            .with_variable("DEPLOY_FLAGS", &self.deploy_flags)
            .with_variable("CODE_HOST_REPO", self.code_host_repo.clone().unwrap_or_default())
            .with_variable(
                "GIT_REMOTE_ORIGIN",
                self.git_remote_origin.clone().unwrap_or_default(),
            )
            .with_variable(
                "CSS_FRAMEWORK",
                self.css_framework.as_ref().map(Choice::key).unwrap_or_default(),
            )
            .with_variable("STAGING_APP", format!("{kebab}-staging"))
            .with_variable("PRODUCTION_APP", format!("{kebab}-production"))
            .with_variable("RUBY_VERSION", DEFAULT_RUBY_VERSION)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            app_name: "app".to_string(),
            database: Choice::Known(Database::default()),
            skip_deploy_provisioning: false,
            deploy_flags: String::new(),
            code_host_repo: None,
            git_remote_origin: None,
            css_framework: None,
            skip_legacy_test_framework: true,
            skip_vcs: false,
            webpack: false,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_app_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidAppName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let first = name.chars().next().ok_or_else(|| invalid("name is empty"))?;
    if !first.is_ascii_alphabetic() {
        return Err(invalid("must start with a letter"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(invalid(&format!("contains '{bad}'")));
    }
    Ok(())
}
