use std::path::Path;

use tracing::{info, instrument};

use trestle_core::{
    application::{
        ApplicationError,
        ports::{BaseGenerator, CommandRunner},
    },
    domain::{Configuration, Invocation},
    error::TrestleResult,
};

/// Creates the base project with `rails new`.
///
/// Bundling and git are left to the scaffold pipeline, so the generator is
/// always told to skip both.
pub struct RailsGenerator<R> {
    runner: R,
}

impl<R: CommandRunner> RailsGenerator<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// The `rails new` invocation for `config`, run from `root`'s parent.
    pub fn invocation(config: &Configuration, root: &Path) -> Invocation {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.app_name().to_string());
        let mut args = vec![
            "new".to_string(),
            name,
            format!("--database={}", config.database().key()),
            "--skip-bundle".to_string(),
            "--skip-git".to_string(),
        ];
        if config.skip_legacy_test_framework() {
            args.push("--skip-test".to_string());
        }
        if config.webpack() {
            args.push("--javascript=webpack".to_string());
        }

        let cwd = root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Invocation::new("rails", args, cwd)
    }
}

impl<R: CommandRunner> BaseGenerator for RailsGenerator<R> {
    #[instrument(skip_all, fields(root = %root.display()))]
    fn create_project(&self, config: &Configuration, root: &Path) -> TrestleResult<()> {
        let invocation = Self::invocation(config, root);
        info!(command = %invocation, "Generating base project");

        let failed = |exit_code: Option<i32>, reason: String| ApplicationError::StepFailed {
            step: "create_base_project".to_string(),
            command: invocation.command_line(),
            exit_code,
            reason,
        };

        match self.runner.run(&invocation) {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(failed(
                status.code,
                format!("exited with status {}", status.code.unwrap_or(-1)),
            )
            .into()),
            Err(e) => Err(failed(None, format!("could not be started: {e}")).into()),
        }
    }

    fn name(&self) -> &'static str {
        "rails"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingRunner;
    use trestle_core::domain::ScaffoldOptions;

    fn config(f: impl FnOnce(&mut ScaffoldOptions)) -> Configuration {
        let mut options = ScaffoldOptions::new("shop");
        f(&mut options);
        Configuration::from_options(options).unwrap()
    }

    #[test]
    fn default_invocation() {
        let inv = RailsGenerator::<RecordingRunner>::invocation(&config(|_| {}), Path::new("work/shop"));
        assert_eq!(
            inv.command_line(),
            "rails new shop --database=postgresql --skip-bundle --skip-git --skip-test"
        );
        assert_eq!(inv.cwd, Path::new("work"));
    }

    #[test]
    fn webpack_and_test_unit_flags() {
        let inv = RailsGenerator::<RecordingRunner>::invocation(
            &config(|o| {
                o.webpack = true;
                o.skip_legacy_test_framework = false;
                o.database = "mysql".into();
            }),
            Path::new("shop"),
        );
        assert!(inv.args.contains(&"--javascript=webpack".to_string()));
        assert!(inv.args.contains(&"--database=mysql".to_string()));
        assert!(!inv.args.contains(&"--skip-test".to_string()));
        assert_eq!(inv.cwd, Path::new("."));
    }

    #[test]
    fn failure_is_reported_as_base_step() {
        let line = "rails new shop --database=postgresql --skip-bundle --skip-git --skip-test";
        let runner = RecordingRunner::new().fail_on(line, 1);
        let err = RailsGenerator::new(runner)
            .create_project(&config(|_| {}), Path::new("shop"))
            .unwrap_err();
        assert!(err.to_string().contains("create_base_project"));
    }
}
