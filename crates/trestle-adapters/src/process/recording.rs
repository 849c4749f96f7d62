//! Command runner that records invocations instead of running them.

use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use tracing::debug;

use trestle_core::{
    application::ports::{CommandRunner, CommandStatus},
    domain::Invocation,
};

/// Records every invocation in order and answers with scripted results.
///
/// Clones share the same log, so a test can keep one and hand the other to
/// a service.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    inner: Arc<Mutex<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    invocations: Vec<Invocation>,
    /// Command line -> exit code.
    failures: HashMap<String, i32>,
    /// Command lines that cannot be spawned.
    missing: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command_line` (e.g. `"git init"`) exit with `code`.
    pub fn fail_on(self, command_line: &str, code: i32) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failures.insert(command_line.to_string(), code);
        }
        self
    }

    /// Make `command_line` fail to start.
    pub fn missing(self, command_line: &str) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.missing.push(command_line.to_string());
        }
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner
            .lock()
            .map(|inner| inner.invocations.clone())
            .unwrap_or_default()
    }

    /// Recorded invocations as shell-quoted command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandStatus> {
        let line = invocation.command_line();
        debug!(command = %line, "recording command");

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("recording runner lock poisoned"))?;
        inner.invocations.push(invocation.clone());

        if inner.missing.contains(&line) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", invocation.program),
            ));
        }
        Ok(match inner.failures.get(&line) {
            Some(code) => CommandStatus::exited(*code),
            None => CommandStatus::SUCCESS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_failures_and_shared_log() {
        let runner = RecordingRunner::new().fail_on("bundle check", 1);
        let view = runner.clone();

        let check = Invocation::new("bundle", vec!["check".into()], ".");
        let install = Invocation::new("bundle", vec!["install".into()], ".");
        assert_eq!(runner.run(&check).unwrap().code, Some(1));
        assert!(runner.run(&install).unwrap().success());

        assert_eq!(view.command_lines(), vec!["bundle check", "bundle install"]);
    }

    #[test]
    fn missing_programs_fail_to_spawn() {
        let runner = RecordingRunner::new().missing("hub create acme/shop");
        let inv = Invocation::new("hub", vec!["create".into(), "acme/shop".into()], ".");
        assert_eq!(runner.run(&inv).unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
