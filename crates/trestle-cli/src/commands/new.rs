//! Implementation of the `trestle new` command.
//!
//! Responsibility: translate CLI arguments into `ScaffoldOptions`, call the
//! core scaffold service, and display results. No business logic lives here.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use trestle_adapters::{
    LocalFilesystem, PathProbe, ProcessRunner, RailsGenerator, SimpleRenderer,
};
use trestle_core::{
    application::{
        ApplicationError, ScaffoldRequest, ScaffoldService,
        ports::ToolProbe,
    },
    domain::{Configuration, PlannedStep, RequiredTool, RunReport, ScaffoldOptions},
};

use crate::{
    cli::{GlobalArgs, NewArgs},
    commands::template_store,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `trestle new` command.
///
/// Dispatch sequence:
/// 1. Derive the application name from the path and merge config defaults
/// 2. Dry run: print the plan and stop
/// 3. Validate, then check the target directory and the `rails` binary
/// 4. Confirm with the user unless `--yes`, `--quiet`, or stdin is piped
/// 5. Generate the base project and run the scaffold pipeline
/// 6. Print warnings and next steps
#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = absolute(&args.path)?;
    let options = build_options(&args, &config, &root)?;
    debug!(?options, "Options assembled");

    let runner = ProcessRunner::new().quiet(global.quiet || output.is_json());
    let probe = PathProbe::new();
    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        template_store(&config)?,
        Box::new(SimpleRenderer::new()),
        Box::new(runner),
        Box::new(probe),
        Box::new(RailsGenerator::new(runner)),
    );

    if args.dry_run {
        let configuration = Configuration::from_options(options)
            .map_err(|e| CliError::Core(e.into()))?;
        let plan = service.plan(&configuration).map_err(CliError::Core)?;
        let missing = service.missing_tools(&configuration);
        return show_plan(&configuration, &plan, &missing, &root, &output);
    }

    // Name validation and tool checks fail before anything touches disk.
    service.resolve(options.clone()).with_cli_context(|| "resolve")?;

    if !args.skip_base {
        if root.exists() {
            return Err(CliError::Core(
                ApplicationError::ProjectExists { path: root }.into(),
            ));
        }
        if !probe.is_available("rails") {
            return Err(CliError::Core(
                ApplicationError::PreconditionFailed {
                    tool: "rails".into(),
                    reason: "rails generates the base project; pass --skip-base to apply onto an existing one"
                        .into(),
                }
                .into(),
            ));
        }
    }

    let interactive = std::io::stdin().is_terminal();
    if interactive && !global.quiet && !args.yes && !output.is_json() {
        show_configuration(&options, &root, args.skip_base, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    output.header(&format!("Creating '{}'...", options.app_name))?;
    info!(app = %options.app_name, root = %root.display(), "Scaffold started");

    let app_name = options.app_name.clone();
    let report = service
        .scaffold(
            options,
            &root,
            ScaffoldRequest {
                skip_base: args.skip_base,
            },
            &output,
        )
        .with_cli_context(|| "scaffold")?;

    show_report(&report, &app_name, &root, &output)
}

// ── Options ───────────────────────────────────────────────────────────────────

/// Resolve `path` against the current directory.
fn absolute(path: &Path) -> CliResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().with_cli_context(|| "reading current directory")?;
    Ok(cwd.join(path))
}

/// The application name is the final component of the project path.
pub fn app_name_from_path(path: &Path) -> CliResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| *n != "..")
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidProjectPath {
            path: path.to_path_buf(),
        })
}

/// Flags win over config defaults; boolean flags can only switch a default on.
fn build_options(args: &NewArgs, config: &AppConfig, root: &Path) -> CliResult<ScaffoldOptions> {
    let defaults = &config.defaults;
    let mut options = ScaffoldOptions::new(app_name_from_path(root)?);

    options.database = args
        .database
        .clone()
        .unwrap_or_else(|| defaults.database.clone());
    options.skip_deploy_provisioning = args.skip_deploy || defaults.skip_deploy;
    options.deploy_flags = args
        .deploy_flags
        .clone()
        .unwrap_or_else(|| defaults.deploy_flags.clone());
    options.code_host_repo = args.github.clone();
    options.git_remote_origin = args.origin.clone();
    options.css_framework = args
        .css_framework
        .clone()
        .or_else(|| defaults.css_framework.clone());
    options.skip_legacy_test_framework = args.skip_test;
    options.skip_vcs = args.skip_git || defaults.skip_git;
    options.webpack = args.webpack || defaults.webpack;

    Ok(options)
}

// ── UI helpers ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PlanDocument<'a> {
    root: &'a Path,
    configuration: &'a Configuration,
    missing_tools: Vec<&'static str>,
    steps: &'a [PlannedStep],
}

fn show_plan(
    configuration: &Configuration,
    plan: &[PlannedStep],
    missing: &[RequiredTool],
    root: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    if out.is_json() {
        out.json(&PlanDocument {
            root,
            configuration,
            missing_tools: missing.iter().map(|t| t.name).collect(),
            steps: plan,
        })?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would create '{}' at {}",
        configuration.app_name(),
        root.display()
    ))?;
    out.print("")?;

    for step in plan {
        let indent = "  ".repeat(step.depth + 1);
        let mark = if step.runs { "\u{2713}" } else { "-" };
        let mut line = format!("{indent}{mark} {}", step.name);
        if let Some(note) = &step.note {
            line.push_str(&format!("  ({note})"));
        }
        if step.runs {
            out.print(&line)?;
            for action in &step.actions {
                out.detail(&format!("{indent}    {action}"))?;
            }
        } else {
            out.detail(&line)?;
        }
    }

    for tool in missing {
        out.warn(&format!("{} is not on PATH: {}", tool.name, tool.reason))?;
    }
    Ok(())
}

fn show_configuration(
    options: &ScaffoldOptions,
    root: &Path,
    skip_base: bool,
    out: &OutputManager,
) -> CliResult<()> {
    let or_none = |value: &Option<String>| value.clone().unwrap_or_else(|| "none".into());

    out.header("Configuration")?;
    out.print(&format!("  Application:   {}", options.app_name))?;
    out.print(&format!("  Location:      {}", root.display()))?;
    out.print(&format!("  Database:      {}", options.database))?;
    out.print(&format!("  CSS framework: {}", or_none(&options.css_framework)))?;
    out.print(&format!("  Git:           {}", if options.skip_vcs { "skip" } else { "init" }))?;
    out.print(&format!("  Code host:     {}", or_none(&options.code_host_repo)))?;
    out.print(&format!(
        "  Deploy apps:   {}",
        if options.skip_deploy_provisioning { "skip" } else { "create" }
    ))?;
    if skip_base {
        out.print("  Base project:  existing (--skip-base)")?;
    }
    out.print("")?;
    Ok(())
}

fn show_report(report: &RunReport, app_name: &str, root: &Path, out: &OutputManager) -> CliResult<()> {
    if out.is_json() {
        out.json(report)?;
        return Ok(());
    }

    out.success(&format!("Project '{app_name}' created!"))?;
    for line in next_steps(root) {
        out.print(&line)?;
    }
    Ok(())
}

/// Closing lines after a successful run. Warnings are not repeated here;
/// the progress reporter printed them as they came up.
fn next_steps(root: &Path) -> Vec<String> {
    vec![
        String::new(),
        "Next steps:".to_string(),
        format!("  cd {}", root.display()),
        "  bin/setup".to_string(),
    ]
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read confirmation".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(argv: &[&str]) -> NewArgs {
        let mut full = vec!["trestle", "new"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::New(args) => args,
            _ => panic!("expected New command"),
        }
    }

    #[test]
    fn app_name_is_last_component() {
        assert_eq!(app_name_from_path(Path::new("/work/shop")).unwrap(), "shop");
        assert_eq!(app_name_from_path(Path::new("../apps/shop")).unwrap(), "shop");
    }

    #[test]
    fn unusable_paths_are_rejected() {
        assert!(matches!(
            app_name_from_path(Path::new("/")),
            Err(CliError::InvalidProjectPath { .. })
        ));
        assert!(app_name_from_path(Path::new("..")).is_err());
    }

    #[test]
    fn flags_override_config_defaults() {
        let mut config = AppConfig::default();
        config.defaults.database = "mysql".into();
        config.defaults.css_framework = Some("foundation".into());
        config.defaults.skip_git = true;

        let options = build_options(
            &parse(&["shop", "-d", "sqlite3"]),
            &config,
            Path::new("/w/shop"),
        )
        .unwrap();
        assert_eq!(options.database, "sqlite3");
        assert_eq!(options.css_framework.as_deref(), Some("foundation"));
        assert!(options.skip_vcs);
        assert!(options.skip_legacy_test_framework);
    }

    #[test]
    fn defaults_fill_missing_flags() {
        let options =
            build_options(&parse(&["shop"]), &AppConfig::default(), Path::new("/w/shop")).unwrap();
        assert_eq!(options.app_name, "shop");
        assert_eq!(options.database, "postgresql");
        assert_eq!(options.deploy_flags, "");
        assert!(!options.webpack);
    }

    #[test]
    fn closing_lines_are_only_next_steps() {
        assert_eq!(
            next_steps(Path::new("/w/shop")),
            vec!["", "Next steps:", "  cd /w/shop", "  bin/setup"]
        );
    }

    #[test]
    fn relative_paths_become_absolute() {
        assert!(absolute(Path::new("shop")).unwrap().is_absolute());
        assert_eq!(absolute(Path::new("/a/b")).unwrap(), PathBuf::from("/a/b"));
    }
}
