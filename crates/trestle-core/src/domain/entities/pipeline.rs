//! Ordered step pipelines.
//!
//! A [`Pipeline`] is built once through [`PipelineBuilder`]; registration
//! order is execution order. Step names are unique across the whole tree,
//! nested group members included, so outcomes in a run report can be keyed
//! by name alone.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{
    entities::{
        configuration::Configuration,
        step::{BranchDecision, Step, StepBody},
    },
    error::DomainError,
};

#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level steps in registration order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Every step depth-first, with its nesting depth.
    pub fn flatten(&self) -> Vec<(usize, &Step)> {
        fn walk<'a>(steps: &'a [Step], depth: usize, out: &mut Vec<(usize, &'a Step)>) {
            for step in steps {
                out.push((depth, step));
                if let StepBody::Group(children) = step.body() {
                    walk(children, depth + 1, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.steps, 0, &mut out);
        out
    }

    pub fn len(&self) -> usize {
        self.flatten().len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Evaluate every condition against `config` without side effects.
    ///
    /// Members of a group whose condition fails are planned as skipped.
    pub fn plan(&self, config: &Configuration) -> Vec<PlannedStep> {
        fn walk(steps: &[Step], depth: usize, gated: bool, config: &Configuration, out: &mut Vec<PlannedStep>) {
            for step in steps {
                let runs = gated && step.should_run(config);
                let (actions, note) = match step.body() {
                    StepBody::Actions(actions) => {
                        (actions.iter().map(|a| a.describe()).collect(), None)
                    }
                    StepBody::Group(_) => (Vec::new(), None),
                    StepBody::Branch(branch) => match branch.decide(config) {
                        BranchDecision::Arm(arm) => (
                            arm.actions.iter().map(|a| a.describe()).collect(),
                            Some(format!("{} = {}", branch.option(), arm.value)),
                        ),
                        BranchDecision::Unset => {
                            (Vec::new(), Some(format!("{} not set", branch.option())))
                        }
                        BranchDecision::NoArm => (
                            Vec::new(),
                            Some(format!("no action for this {}", branch.option())),
                        ),
                        BranchDecision::Unrecognized => (
                            Vec::new(),
                            Some(format!("unrecognized {}, will warn", branch.option())),
                        ),
                    },
                };

                out.push(PlannedStep {
                    name: step.name(),
                    depth,
                    runs,
                    announce: step.announcement(),
                    actions,
                    note,
                });

                if let StepBody::Group(children) = step.body() {
                    walk(children, depth + 1, runs, config, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.steps, 0, true, config, &mut out);
        out
    }
}

/// One row of a dry-run plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub name: &'static str,
    pub depth: usize,
    pub runs: bool,
    pub announce: Option<&'static str>,
    pub actions: Vec<String>,
    pub note: Option<String>,
}

pub struct PipelineBuilder {
    name: String,
    steps: Vec<Step>,
}

impl PipelineBuilder {
    pub fn register(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> Result<Pipeline, DomainError> {
        if self.steps.is_empty() {
            return Err(DomainError::EmptyPipeline(self.name));
        }

        let pipeline = Pipeline {
            name: self.name,
            steps: self.steps,
        };

        let mut seen = HashSet::new();
        for (_, step) in pipeline.flatten() {
            if !seen.insert(step.name()) {
                return Err(DomainError::DuplicateStep {
                    pipeline: pipeline.name.clone(),
                    name: step.name().to_string(),
                });
            }
        }

        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        configuration::ScaffoldOptions,
        step::{CommandSpec, SubAction},
    };

    fn cmd(program: &'static str) -> SubAction {
        SubAction::command(CommandSpec::new(program))
    }

    #[test]
    fn preserves_registration_order() {
        let pipeline = Pipeline::builder("t")
            .register(Step::actions("b", vec![]))
            .register(Step::actions("a", vec![]))
            .register(Step::actions("c", vec![]))
            .build()
            .unwrap();

        let names: Vec<_> = pipeline.steps().iter().map(Step::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Pipeline::builder("t")
            .register(Step::actions("a", vec![]))
            .register(Step::actions("a", vec![]))
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateStep { name, .. } if name == "a"));
    }

    #[test]
    fn rejects_duplicates_inside_groups() {
        let err = Pipeline::builder("t")
            .register(Step::actions("init", vec![]))
            .register(Step::group("git", vec![Step::actions("init", vec![])]))
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateStep { .. }));
    }

    #[test]
    fn rejects_empty_pipeline() {
        assert_eq!(
            Pipeline::builder("t").build().unwrap_err(),
            DomainError::EmptyPipeline("t".into())
        );
    }

    #[test]
    fn plan_skips_members_of_a_gated_group() {
        let pipeline = Pipeline::builder("t")
            .register(
                Step::group("git", vec![Step::actions("init_git", vec![cmd("git")])])
                    .when("!skip_vcs", |c| !c.skip_vcs()),
            )
            .build()
            .unwrap();

        let mut options = ScaffoldOptions::new("shop");
        options.skip_vcs = true;
        let config = Configuration::from_options(options).unwrap();

        let plan = pipeline.plan(&config);
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|p| !p.runs));
        assert_eq!(plan[1].depth, 1);
        assert_eq!(plan[1].actions, vec!["run git".to_string()]);
    }
}
