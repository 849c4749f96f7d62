//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "trestle",
    bin_name = "trestle",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Opinionated Rails starter projects",
    long_about = "Trestle generates a Rails application with `rails new`, then \
                  applies an opinionated set of templates, gems, tooling and \
                  deployment setup on top of it.",
    after_help = "EXAMPLES:\n\
        \x20 trestle new shop\n\
        \x20 trestle new shop --database mysql --css-framework bootstrap --skip-deploy\n\
        \x20 trestle new shop --dry-run\n\
        \x20 trestle setup ./shop\n\
        \x20 trestle list steps",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new Rails project.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 trestle new shop\n\
            \x20 trestle new ../shop -d mysql -C bourbon\n\
            \x20 trestle new shop --github acme/shop --origin git@github.com:acme/shop.git\n\
            \x20 trestle new shop --skip-base --yes   # apply onto an existing app"
    )]
    New(NewArgs),

    /// Bootstrap an existing project (gems, .env, database, hooks).
    #[command(
        about = "Set up a generated project",
        after_help = "EXAMPLES:\n\
            \x20 trestle setup\n\
            \x20 trestle setup ./shop"
    )]
    Setup(SetupArgs),

    /// List pipeline steps or templates.
    #[command(
        visible_alias = "ls",
        about = "List steps or templates",
        after_help = "EXAMPLES:\n\
            \x20 trestle list steps\n\
            \x20 trestle list steps --pipeline setup --format list\n\
            \x20 trestle list templates --format json"
    )]
    List(ListArgs),

    /// Resolve SMTP settings from the environment.
    #[command(
        about = "Show SMTP settings derived from the environment",
        after_help = "EXAMPLES:\n\
            \x20 SMTP_PROVIDER=sendgrid trestle smtp\n\
            \x20 trestle smtp --reveal --output-format json"
    )]
    Smtp(SmtpArgs),

    /// Initialise a Trestle configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 trestle init           # default location\n\
            \x20 trestle init --local   # ./.trestle.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 trestle completions bash > ~/.local/share/bash-completion/completions/trestle\n\
            \x20 trestle completions zsh  > ~/.zfunc/_trestle\n\
            \x20 trestle completions fish > ~/.config/fish/completions/trestle.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Trestle configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 trestle config get defaults.database\n\
            \x20 trestle config set defaults.database mysql\n\
            \x20 trestle config list"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `trestle new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project path.  The last component is the application name.
    #[arg(value_name = "PATH", help = "Project path (last component is the app name)")]
    pub path: PathBuf,

    /// Database adapter passed to `rails new`.
    #[arg(
        short = 'd',
        long = "database",
        value_name = "DATABASE",
        help = "Database (postgresql, mysql, sqlite3, ...) [default: postgresql]"
    )]
    pub database: Option<String>,

    /// Skip creating staging and production apps.
    #[arg(
        short = 'H',
        long = "skip-deploy",
        visible_alias = "skip-heroku",
        help = "Skip deployment app provisioning"
    )]
    pub skip_deploy: bool,

    /// Extra flags passed to each deployment app create command.
    #[arg(
        long = "deploy-flags",
        visible_alias = "heroku-flags",
        value_name = "FLAGS",
        allow_hyphen_values = true,
        help = "Extra flags for deployment app creation"
    )]
    pub deploy_flags: Option<String>,

    /// Create a code host repository (`owner/name`).
    #[arg(
        short = 'G',
        long = "github",
        value_name = "REPO",
        help = "Create a code host repository"
    )]
    pub github: Option<String>,

    /// Add this URL as the `origin` remote and push.
    #[arg(long = "origin", value_name = "URL", help = "Git remote origin to push to")]
    pub origin: Option<String>,

    /// CSS framework to install.
    #[arg(
        short = 'C',
        long = "css-framework",
        value_name = "FRAMEWORK",
        help = "CSS framework (bourbon_n_friends, bootstrap, foundation, none)"
    )]
    pub css_framework: Option<String>,

    /// Replace the default test framework with rspec.
    #[arg(
        short = 'T',
        long = "skip-test",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help = "Skip the default test framework in favour of rspec"
    )]
    pub skip_test: bool,

    /// Do not initialise git or push anywhere.
    #[arg(long = "skip-git", help = "Skip git initialisation")]
    pub skip_git: bool,

    /// Add webpack support (requires yarn).
    #[arg(long = "webpack", help = "Set up webpack")]
    pub webpack: bool,

    /// Apply the pipeline onto an existing project instead of running
    /// `rails new` first.
    #[arg(long = "skip-base", help = "Apply onto an existing project")]
    pub skip_base: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Print the step plan without touching disk or running anything.
    #[arg(long = "dry-run", help = "Show which steps would run without running them")]
    pub dry_run: bool,
}

// ── setup ─────────────────────────────────────────────────────────────────────

/// Arguments for `trestle setup`.
#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Project directory.
    #[arg(value_name = "PATH", default_value = ".", help = "Project directory")]
    pub path: PathBuf,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `trestle list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// What to list.
    #[arg(value_enum, help = "What to list")]
    pub what: ListTarget,

    /// Pipeline whose steps are listed.
    #[arg(
        short = 'p',
        long = "pipeline",
        value_enum,
        default_value = "scaffold",
        help = "Pipeline to list steps for"
    )]
    pub pipeline: PipelineName,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Steps,
    Templates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PipelineName {
    Scaffold,
    Setup,
}

impl PipelineName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scaffold => trestle_core::domain::SCAFFOLD_PIPELINE,
            Self::Setup => trestle_core::domain::SETUP_PIPELINE,
        }
    }
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── smtp ──────────────────────────────────────────────────────────────────────

/// Arguments for `trestle smtp`.
#[derive(Debug, Args)]
pub struct SmtpArgs {
    /// Print the password instead of masking it.
    #[arg(long = "reveal", help = "Show the SMTP password")]
    pub reveal: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `trestle init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.trestle.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `trestle completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `trestle config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.database`.
        key: String,
    },
    /// Set a configuration key in the configuration file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    fn new_args(argv: &[&str]) -> NewArgs {
        let mut full = vec!["trestle", "new"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::New(args) => args,
            other => panic!("expected New command, got {other:?}"),
        }
    }

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn new_defaults() {
        let args = new_args(&["shop"]);
        assert_eq!(args.path, PathBuf::from("shop"));
        assert!(args.skip_test);
        assert!(!args.skip_git);
        assert!(!args.skip_deploy);
        assert_eq!(args.database, None);
    }

    #[test]
    fn skip_test_can_be_turned_off() {
        assert!(new_args(&["shop", "-T"]).skip_test);
        assert!(!new_args(&["shop", "--skip-test=false"]).skip_test);
    }

    #[test]
    fn legacy_aliases_are_accepted() {
        let args = new_args(&[
            "shop",
            "--skip-heroku",
            "--heroku-flags",
            "--region eu",
            "-G",
            "acme/shop",
        ]);
        assert!(args.skip_deploy);
        assert_eq!(args.deploy_flags.as_deref(), Some("--region eu"));
        assert_eq!(args.github.as_deref(), Some("acme/shop"));
    }

    #[test]
    fn short_flags() {
        let args = new_args(&["shop", "-d", "mysql", "-C", "bootstrap", "-H"]);
        assert_eq!(args.database.as_deref(), Some("mysql"));
        assert_eq!(args.css_framework.as_deref(), Some("bootstrap"));
        assert!(args.skip_deploy);
    }

    #[test]
    fn list_defaults_to_scaffold_table() {
        let cli = Cli::parse_from(["trestle", "ls", "steps"]);
        let Commands::List(args) = cli.command else {
            panic!("expected List command");
        };
        assert_eq!(args.what, ListTarget::Steps);
        assert_eq!(args.pipeline.as_str(), "scaffold");
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["trestle", "--quiet", "--verbose", "list", "steps"]);
        assert!(result.is_err());
    }
}
