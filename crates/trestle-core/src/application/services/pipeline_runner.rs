//! Pipeline Runner - interprets step records against the ports.
//!
//! Execution is strictly sequential and fail-fast:
//! 1. Steps run in registration order, nested group members depth-first
//! 2. A step whose condition fails is recorded as skipped
//! 3. The first failing sub-action aborts the run; nothing is retried or
//!    rolled back
//!
//! Unrecognized branch values are the one non-fatal condition: a warning is
//! recorded and the run continues.

use std::path::Path;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem, NoProgress, ProgressReporter, TemplateRenderer, TemplateStore},
    },
    domain::{
        BranchDecision, CommandSpec, Configuration, Pipeline, RenderContext, RunReport, RunState,
        Step, StepBody, StepStatus, SubAction, Warning,
    },
    error::TrestleResult,
};

static NO_PROGRESS: NoProgress = NoProgress;

pub struct PipelineRunner<'a> {
    filesystem: &'a dyn Filesystem,
    commands: &'a dyn CommandRunner,
    templates: Option<(&'a dyn TemplateStore, &'a dyn TemplateRenderer)>,
    progress: &'a dyn ProgressReporter,
}

/// Mutable state of one run.
struct Execution<'c> {
    config: &'c Configuration,
    root: &'c Path,
    context: RenderContext,
    state: RunState,
    report: RunReport,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, commands: &'a dyn CommandRunner) -> Self {
        Self {
            filesystem,
            commands,
            templates: None,
            progress: &NO_PROGRESS,
        }
    }

    /// Enable `Render` sub-actions.
    pub fn with_templates(
        mut self,
        store: &'a dyn TemplateStore,
        renderer: &'a dyn TemplateRenderer,
    ) -> Self {
        self.templates = Some((store, renderer));
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Run every step of `pipeline` inside `root`.
    #[instrument(skip_all, fields(pipeline = pipeline.name(), root = %root.display()))]
    pub fn run(
        &self,
        pipeline: &Pipeline,
        config: &Configuration,
        root: &Path,
    ) -> TrestleResult<RunReport> {
        let mut exec = Execution {
            config,
            root,
            context: config
                .render_context()
                .with_variable("STAGING_SECRET_KEY_BASE", secret_key_base())
                .with_variable("PRODUCTION_SECRET_KEY_BASE", secret_key_base()),
            state: RunState::Init,
            report: RunReport::new(pipeline.name()),
        };
        info!(run_id = %exec.report.run_id, "Pipeline started");

        for step in pipeline.steps() {
            self.run_step(step, true, &mut exec)?;
        }

        exec.state = exec.state.complete()?;
        info!(
            executed = exec.report.executed().len(),
            skipped = exec.report.skipped().len(),
            warnings = exec.report.warnings.len(),
            "Pipeline completed"
        );
        Ok(exec.report)
    }

    fn run_step(&self, step: &Step, gated: bool, exec: &mut Execution<'_>) -> TrestleResult<()> {
        if !(gated && step.should_run(exec.config)) {
            self.skip(step, exec);
            return Ok(());
        }

        match step.body() {
            StepBody::Actions(actions) => {
                self.enter(step, exec)?;
                self.guarded(step, exec, |runner, exec| {
                    for action in actions {
                        runner.run_action(step.name(), action, exec)?;
                    }
                    Ok(())
                })?;
                exec.report.record(step.name(), StepStatus::Done);
            }
            StepBody::Group(children) => {
                self.enter(step, exec)?;
                exec.report.record(step.name(), StepStatus::Done);
                for child in children {
                    self.run_step(child, true, exec)?;
                }
            }
            StepBody::Branch(branch) => match branch.decide(exec.config) {
                BranchDecision::Arm(arm) => {
                    self.enter(step, exec)?;
                    self.guarded(step, exec, |runner, exec| {
                        for action in &arm.actions {
                            runner.run_action(step.name(), action, exec)?;
                        }
                        Ok(())
                    })?;
                    exec.report.record(step.name(), StepStatus::Done);
                }
                BranchDecision::Unrecognized => {
                    let value = branch
                        .selection(exec.config)
                        .map(|s| s.value)
                        .unwrap_or_default();
                    let warning = Warning::UnrecognizedOption {
                        step: step.name().to_string(),
                        option: branch.option().to_string(),
                        value,
                    };
                    warn!(step = step.name(), "{warning}");
                    self.progress.warning(&warning);
                    exec.report.warn(warning);
                    exec.report.record(step.name(), StepStatus::Skipped);
                }
                BranchDecision::Unset | BranchDecision::NoArm => {
                    debug!(step = step.name(), option = branch.option(), "No branch arm applies");
                    exec.report.record(step.name(), StepStatus::Skipped);
                }
            },
        }

        Ok(())
    }

    /// Record `step` and every nested member as skipped.
    fn skip(&self, step: &Step, exec: &mut Execution<'_>) {
        debug!(step = step.name(), condition = step.condition().describe(), "Skipping step");
        self.progress.step_skipped(step.name());
        exec.report.record(step.name(), StepStatus::Skipped);
        if let StepBody::Group(children) = step.body() {
            for child in children {
                self.skip(child, exec);
            }
        }
    }

    fn enter(&self, step: &Step, exec: &mut Execution<'_>) -> TrestleResult<()> {
        exec.state = exec.state.start(step.name())?;
        info!(step = step.name(), "Running step");
        self.progress.step_started(step.name(), step.announcement());
        Ok(())
    }

    /// Run `body`; on failure move the run to `Aborted` before returning.
    fn guarded<F>(&self, step: &Step, exec: &mut Execution<'_>, body: F) -> TrestleResult<()>
    where
        F: FnOnce(&Self, &mut Execution<'_>) -> TrestleResult<()>,
    {
        if let Err(e) = body(self, exec) {
            exec.state = exec.state.abort()?;
            error!(step = step.name(), error = %e, "Step failed, aborting run");
            return Err(e);
        }
        Ok(())
    }

    fn run_action(
        &self,
        step: &str,
        action: &SubAction,
        exec: &mut Execution<'_>,
    ) -> TrestleResult<()> {
        debug!(step, action = %action.describe(), "Sub-action");

        match action {
            SubAction::Render {
                template,
                target,
                executable,
            } => {
                let (store, renderer) =
                    self.templates
                        .ok_or(ApplicationError::AdapterNotConfigured {
                            name: "template store",
                        })?;
                let body = store.get(template)?;
                let content = renderer.render(&body, &exec.context)?;

                let path = target.under(exec.root);
                if let Some(parent) = path.parent() {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.filesystem.write_file(&path, &content)?;
                if *executable {
                    self.filesystem.set_permissions(&path, true)?;
                }
            }
            SubAction::Command(spec) => self.execute(step, spec, exec)?,
            SubAction::Ensure { check, install } => {
                let invocation = check.resolve(&exec.context, exec.root)?;
                self.progress.command_started(&invocation);
                match self.commands.run(&invocation) {
                    Ok(status) if status.success() => {
                        debug!(command = %invocation, "Check passed, install not needed");
                    }
                    _ => self.execute(step, install, exec)?,
                }
            }
            SubAction::CopyIfMissing { source, target } => {
                let to = target.under(exec.root);
                if self.filesystem.exists(&to) {
                    debug!(path = %to.display(), "Already present, leaving untouched");
                } else {
                    self.filesystem.copy_file(&source.under(exec.root), &to)?;
                }
            }
            SubAction::Edit { path, edit } => {
                let path = path.under(exec.root);
                let content = self.filesystem.read_file(&path)?;
                if let Some(anchor) = edit.missing_anchor(&content) {
                    let warning = Warning::AnchorNotFound {
                        step: step.to_string(),
                        path: path.display().to_string(),
                        anchor: anchor.to_string(),
                    };
                    warn!(step, path = %path.display(), "{warning}");
                    self.progress.warning(&warning);
                    exec.report.warn(warning);
                }
                let edited = edit.apply(&content);
                if edited != content {
                    self.filesystem.write_file(&path, &edited)?;
                }
            }
        }

        Ok(())
    }

    /// Run a command; any non-zero exit or spawn error fails the step.
    fn execute(&self, step: &str, spec: &CommandSpec, exec: &Execution<'_>) -> TrestleResult<()> {
        let invocation = spec.resolve(&exec.context, exec.root)?;
        self.progress.command_started(&invocation);
        debug!(command = %invocation, cwd = %invocation.cwd.display(), "Running command");

        let failed = |exit_code: Option<i32>, reason: String| ApplicationError::StepFailed {
            step: step.to_string(),
            command: invocation.command_line(),
            exit_code,
            reason,
        };

        match self.commands.run(&invocation) {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => {
                let reason = match status.code {
                    Some(code) => format!("exited with status {code}"),
                    None => "was terminated by a signal".to_string(),
                };
                Err(failed(status.code, reason).into())
            }
            Err(e) => Err(failed(None, format!("could not be started: {e}")).into()),
        }
    }
}

/// 128 hex characters, fresh for every call.
fn secret_key_base() -> String {
    (0..4).map(|_| Uuid::new_v4().simple().to_string()).collect()
}
