//! `trestle smtp`: show the mail settings a generated app would boot with.

use trestle_core::domain::SmtpSettings;

use crate::{
    cli::{GlobalArgs, SmtpArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

const MASK: &str = "********";

pub fn execute(
    args: SmtpArgs,
    _global: GlobalArgs,
    _config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut settings = SmtpSettings::from_lookup(|key| std::env::var(key).ok())
        .map_err(|e| CliError::Core(e.into()))?;

    if !args.reveal {
        settings.password = MASK.to_string();
    }

    if output.is_json() {
        output.json(&settings)?;
        return Ok(());
    }

    output.header("SMTP settings:")?;
    for (key, value) in settings.entries() {
        output.print(&format!("  {key:<22} {value}"))?;
    }
    Ok(())
}
