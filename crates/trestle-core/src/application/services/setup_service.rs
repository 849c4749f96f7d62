//! Setup Service - bootstraps an already generated project.
//!
//! Mirrors the generated `bin/setup`: install gems, seed `.env`, prepare the
//! database, install commit hooks. Any failing command aborts.

use std::path::Path;
use tracing::{info, instrument};

use crate::{
    application::{
        ports::{CommandRunner, Filesystem, ProgressReporter},
        services::pipeline_runner::PipelineRunner,
    },
    domain::{Configuration, Pipeline, RunReport, setup_pipeline},
    error::TrestleResult,
};

pub struct SetupService {
    filesystem: Box<dyn Filesystem>,
    commands: Box<dyn CommandRunner>,
}

impl SetupService {
    pub fn new(filesystem: Box<dyn Filesystem>, commands: Box<dyn CommandRunner>) -> Self {
        Self {
            filesystem,
            commands,
        }
    }

    pub fn pipeline(&self) -> TrestleResult<Pipeline> {
        Ok(setup_pipeline()?)
    }

    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn run(&self, root: &Path, progress: &dyn ProgressReporter) -> TrestleResult<RunReport> {
        let pipeline = self.pipeline()?;
        let report = PipelineRunner::new(self.filesystem.as_ref(), self.commands.as_ref())
            .with_progress(progress)
            .run(&pipeline, &Configuration::default(), root)?;

        info!(run_id = %report.run_id, "Setup completed");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::{
        ApplicationError,
        ports::{CommandStatus, MockCommandRunner, MockFilesystem, NoProgress},
    };
    use crate::error::TrestleError;

    #[test]
    fn db_setup_failure_stops_before_commit_hooks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&log);
        let mut commands = MockCommandRunner::new();
        commands.expect_run().returning(move |inv| {
            let line = inv.command_line();
            seen.lock().unwrap().push(line.clone());
            Ok(if line == "bin/rails db:setup" {
                CommandStatus::exited(1)
            } else {
                CommandStatus::SUCCESS
            })
        });

        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_copy_file().times(1).returning(|_, _| Ok(()));

        let err = SetupService::new(Box::new(fs), Box::new(commands))
            .run(Path::new("/app"), &NoProgress)
            .unwrap_err();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "gem install bundler --conservative",
                "bundle check",
                "bin/rails db:setup"
            ]
        );
        assert!(matches!(
            err,
            TrestleError::Application(ApplicationError::StepFailed { ref step, .. })
                if step == "prepare_database"
        ));
    }
}
