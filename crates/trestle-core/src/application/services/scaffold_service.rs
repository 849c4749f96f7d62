//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire scaffolding workflow:
//! 1. Resolve options into a configuration and check required tools
//! 2. Create the base project through the host generator
//! 3. Run the scaffold pipeline inside it
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::Path;
use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{
            BaseGenerator, CommandRunner, Filesystem, ProgressReporter, TemplateRenderer,
            TemplateStore, ToolProbe,
        },
        services::{pipeline_runner::PipelineRunner, resolver::ConfigurationResolver},
    },
    domain::{
        Configuration, Pipeline, PlannedStep, RequiredTool, RunReport, ScaffoldOptions,
        scaffold_pipeline,
    },
    error::TrestleResult,
};

/// How a scaffold run treats the target directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScaffoldRequest {
    /// Apply the pipeline onto an existing skeleton instead of generating one.
    pub skip_base: bool,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    commands: Box<dyn CommandRunner>,
    probe: Box<dyn ToolProbe>,
    base: Box<dyn BaseGenerator>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        commands: Box<dyn CommandRunner>,
        probe: Box<dyn ToolProbe>,
        base: Box<dyn BaseGenerator>,
    ) -> Self {
        Self {
            filesystem,
            store,
            renderer,
            commands,
            probe,
            base,
        }
    }

    /// Validate options and check preconditions without touching disk.
    pub fn resolve(&self, options: ScaffoldOptions) -> TrestleResult<Configuration> {
        ConfigurationResolver::new(self.probe.as_ref()).resolve(options)
    }

    pub fn missing_tools(&self, config: &Configuration) -> Vec<RequiredTool> {
        ConfigurationResolver::new(self.probe.as_ref()).missing_tools(config)
    }

    pub fn pipeline(&self) -> TrestleResult<Pipeline> {
        Ok(scaffold_pipeline()?)
    }

    /// Dry-run: which steps would run for `config`.
    pub fn plan(&self, config: &Configuration) -> TrestleResult<Vec<PlannedStep>> {
        Ok(self.pipeline()?.plan(config))
    }

    /// Scaffold a new project at `root`.
    ///
    /// Preconditions are checked before the base generator runs, so a
    /// missing tool never leaves a half-created directory behind.
    #[instrument(
        skip_all,
        fields(app = %options.app_name, root = %root.display(), skip_base = request.skip_base)
    )]
    pub fn scaffold(
        &self,
        options: ScaffoldOptions,
        root: &Path,
        request: ScaffoldRequest,
        progress: &dyn ProgressReporter,
    ) -> TrestleResult<RunReport> {
        let config = self.resolve(options)?;
        info!(database = %config.database(), "Configuration resolved");

        if request.skip_base {
            if !self.filesystem.exists(root) {
                return Err(ApplicationError::ValidationFailed(format!(
                    "--skip-base needs an existing project at {}",
                    root.display()
                ))
                .into());
            }
        } else {
            if self.filesystem.exists(root) {
                return Err(ApplicationError::ProjectExists {
                    path: root.to_path_buf(),
                }
                .into());
            }
            info!(generator = self.base.name(), "Creating base project");
            self.base.create_project(&config, root)?;
        }

        let pipeline = self.pipeline()?;
        let report = PipelineRunner::new(self.filesystem.as_ref(), self.commands.as_ref())
            .with_templates(self.store.as_ref(), self.renderer.as_ref())
            .with_progress(progress)
            .run(&pipeline, &config, root)?;

        info!(run_id = %report.run_id, "Scaffold completed successfully");
        Ok(report)
    }
}
