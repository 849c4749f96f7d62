//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `trestle-adapters` crate provides implementations.

use std::io;
use std::path::Path;

use crate::domain::{Configuration, Invocation, RenderContext, TemplateBody, TemplateId, Warning};
use crate::error::TrestleResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `trestle_adapters::filesystem::LocalFilesystem` (production)
/// - `trestle_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> TrestleResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> TrestleResult<()>;

    fn read_file(&self, path: &Path) -> TrestleResult<String>;

    /// Copy bytes from `from` to `to` verbatim.
    fn copy_file(&self, from: &Path, to: &Path) -> TrestleResult<()>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> TrestleResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for template storage and retrieval.
///
/// Implemented by:
/// - `trestle_adapters::template_store::InMemoryStore` (built-in templates)
/// - `trestle_adapters::template_store::DirectoryStore` (local overrides)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Get a template body by id.
    fn get(&self, id: &TemplateId) -> TrestleResult<TemplateBody>;

    /// List all template ids, sorted.
    fn list(&self) -> TrestleResult<Vec<TemplateId>>;
}

/// Port for template rendering.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &TemplateBody, context: &RenderContext) -> TrestleResult<String>;
}

/// How a finished process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub const SUCCESS: Self = Self { code: Some(0) };

    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Port for running external programs.
///
/// Implementations block until the process exits. Only the exit status is
/// inspected; output goes wherever the implementation sends it.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// `Err` means the process could not be started at all.
    fn run(&self, invocation: &Invocation) -> io::Result<CommandStatus>;
}

/// Port answering "is this tool installed?".
#[cfg_attr(test, mockall::automock)]
pub trait ToolProbe: Send + Sync {
    fn is_available(&self, tool: &str) -> bool;
}

/// Port for the host framework generator that creates the base project.
#[cfg_attr(test, mockall::automock)]
pub trait BaseGenerator: Send + Sync {
    /// Create the base skeleton at `root`. `root` must not exist yet.
    fn create_project(&self, config: &Configuration, root: &Path) -> TrestleResult<()>;

    fn name(&self) -> &'static str;
}

/// Receives progress events from a pipeline run.
///
/// Every method defaults to doing nothing.
pub trait ProgressReporter: Send + Sync {
    fn step_started(&self, _step: &str, _announce: Option<&str>) {}

    fn step_skipped(&self, _step: &str) {}

    fn command_started(&self, _invocation: &Invocation) {}

    fn warning(&self, _warning: &Warning) {}
}

/// Reporter that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}
