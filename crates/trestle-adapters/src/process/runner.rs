//! Command runner backed by `std::process`.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use trestle_core::{
    application::ports::{CommandRunner, CommandStatus},
    domain::Invocation,
};

/// Runs commands synchronously, streaming their output to the terminal.
///
/// There is no timeout: a hanging tool hangs the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    quiet: bool,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard child stdout. Stderr stays attached so failures are visible.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Programs given as relative paths (`bin/rails`) resolve against the
/// invocation's working directory, not ours.
fn program_path(invocation: &Invocation) -> PathBuf {
    let program = PathBuf::from(&invocation.program);
    if program.is_relative() && program.components().count() > 1 {
        invocation.cwd.join(program)
    } else {
        program
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(command = %invocation))]
    fn run(&self, invocation: &Invocation) -> io::Result<CommandStatus> {
        let mut command = Command::new(program_path(invocation));
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit());
        if self.quiet {
            command.stdout(Stdio::null());
        } else {
            command.stdout(Stdio::inherit());
        }

        let status = command.status()?;
        debug!(code = ?status.code(), "command exited");
        Ok(CommandStatus { code: status.code() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_programs_resolve_in_cwd() {
        let inv = Invocation::new("bin/rails", vec!["db:setup".into()], "/srv/app");
        assert_eq!(program_path(&inv), PathBuf::from("/srv/app/bin/rails"));

        let inv = Invocation::new("git", vec![], "/srv/app");
        assert_eq!(program_path(&inv), PathBuf::from("git"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("trestle-definitely-not-installed", vec![], dir.path());
        assert!(ProcessRunner::new().run(&inv).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn reports_exit_codes() {
        let dir = tempfile::TempDir::new().unwrap();
        let ok = Invocation::new("sh", vec!["-c".into(), "exit 0".into()], dir.path());
        let bad = Invocation::new("sh", vec!["-c".into(), "exit 3".into()], dir.path());

        let runner = ProcessRunner::new().quiet(true);
        assert!(runner.run(&ok).unwrap().success());
        assert_eq!(runner.run(&bad).unwrap().code, Some(3));
    }
}
