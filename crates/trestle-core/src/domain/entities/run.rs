//! Run lifecycle and the report a pipeline run produces.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Where a run is in its lifecycle.
///
/// ```text
/// Init ──▶ Running(step) ──▶ Running(next) ──▶ … ──▶ Complete
///                 │
///                 └──▶ Aborted(step)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Init,
    Running(String),
    Complete,
    Aborted(String),
}

impl RunState {
    /// Enter `step`. Valid from `Init` or another `Running`.
    pub fn start(&self, step: &str) -> Result<Self, DomainError> {
        match self {
            Self::Init | Self::Running(_) => Ok(Self::Running(step.to_string())),
            _ => Err(self.invalid(&format!("running({step})"))),
        }
    }

    pub fn complete(&self) -> Result<Self, DomainError> {
        match self {
            Self::Init | Self::Running(_) => Ok(Self::Complete),
            _ => Err(self.invalid("complete")),
        }
    }

    /// Abort at the step currently running.
    pub fn abort(&self) -> Result<Self, DomainError> {
        match self {
            Self::Running(step) => Ok(Self::Aborted(step.clone())),
            _ => Err(self.invalid("aborted")),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Aborted(_))
    }

    fn invalid(&self, to: &str) -> DomainError {
        DomainError::InvalidTransition {
            from: self.to_string(),
            to: to.to_string(),
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::Running(step) => write!(f, "running({step})"),
            Self::Complete => f.write_str("complete"),
            Self::Aborted(step) => write!(f, "aborted({step})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Skipped,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: String,
    pub status: StepStatus,
}

/// Non-fatal conditions collected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    UnrecognizedOption {
        step: String,
        option: String,
        value: String,
    },
    /// An edit found nothing to act on, so the file was left as it was.
    AnchorNotFound {
        step: String,
        path: String,
        anchor: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedOption { step, option, value } => write!(
                f,
                "{step}: unrecognized {option} '{value}', nothing was installed for it"
            ),
            Self::AnchorNotFound { step, path, anchor } => write!(
                f,
                "{step}: '{anchor}' not found in {path}, the file was left unchanged"
            ),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub pipeline: String,
    pub outcomes: Vec<StepOutcome>,
    pub warnings: Vec<Warning>,
}

impl RunReport {
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            pipeline: pipeline.into(),
            outcomes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record(&mut self, step: &str, status: StepStatus) {
        self.outcomes.push(StepOutcome {
            step: step.to_string(),
            status,
        });
    }

    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn status_of(&self, step: &str) -> Option<StepStatus> {
        self.outcomes
            .iter()
            .find(|o| o.step == step)
            .map(|o| o.status)
    }

    /// Names of steps that ran, in order.
    pub fn executed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == StepStatus::Done)
            .map(|o| o.step.as_str())
            .collect()
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == StepStatus::Skipped)
            .map(|o| o.step.as_str())
            .collect()
    }
}
