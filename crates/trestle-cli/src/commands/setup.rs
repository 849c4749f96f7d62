//! Implementation of the `trestle setup` command.
//!
//! Bootstraps a project that `trestle new` already generated: gems, `.env`,
//! database, and commit hooks.

use tracing::instrument;

use trestle_adapters::{LocalFilesystem, ProcessRunner};
use trestle_core::application::SetupService;

use crate::{
    cli::{GlobalArgs, SetupArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(
    args: SetupArgs,
    global: GlobalArgs,
    _config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    if !args.path.is_dir() {
        return Err(CliError::NotADirectory { path: args.path });
    }

    let runner = ProcessRunner::new().quiet(global.quiet || output.is_json());
    let service = SetupService::new(Box::new(LocalFilesystem::new()), Box::new(runner));

    output.header(&format!("Setting up {}...", args.path.display()))?;
    let report = service
        .run(&args.path, &output)
        .with_cli_context(|| "setup")?;

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }

    output.success(&format!(
        "Setup finished ({} steps ran, {} skipped)",
        report.executed().len(),
        report.skipped().len()
    ))?;
    output.print("")?;
    output.print("Start the app with:")?;
    output.print("  bin/rails server")?;
    Ok(())
}
