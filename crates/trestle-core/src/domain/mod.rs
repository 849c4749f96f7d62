// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Trestle.
//!
//! Pure data and decisions: option resolution, step records, pipelines, run
//! state, and the mail settings mapping. Filesystem writes, template lookup
//! and process execution are reached only through the ports defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: no filesystem, network, or process calls
//! - **Minimal crates**: std, thiserror, serde, uuid, shell-words
//! - **Immutable configuration**: resolved once, read by every step
//! - **Steps are data**: conditions and branches are evaluated, not executed
//!
pub mod catalog;
pub mod entities;
pub mod error;
pub mod mail;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{
    common::RelativePath,
    configuration::{Configuration, DEFAULT_RUBY_VERSION, RequiredTool, ScaffoldOptions},
    pipeline::{Pipeline, PipelineBuilder, PlannedStep},
    run::{RunReport, RunState, StepOutcome, StepStatus, Warning},
    step::{
        Arg, Branch, BranchArm, BranchDecision, CommandSpec, Condition, Invocation, Selection,
        Step, StepBody, SubAction, TextEdit,
    },
    template::{RenderContext, TemplateBody, TemplateId},
};

pub use catalog::{SCAFFOLD_PIPELINE, SETUP_PIPELINE, scaffold_pipeline, setup_pipeline};
pub use error::{DomainError, ErrorCategory};
pub use mail::{MailProvider, SmtpSettings};
pub use value_objects::{Choice, CssFramework, Database};

#[cfg(test)]
mod tests {
    use super::*;

    fn config(f: impl FnOnce(&mut ScaffoldOptions)) -> Configuration {
        let mut options = ScaffoldOptions::new("shop");
        f(&mut options);
        Configuration::from_options(options).unwrap()
    }

    fn runs(plan: &[PlannedStep], name: &str) -> bool {
        plan.iter()
            .find(|p| p.name == name)
            .map(|p| p.runs)
            .unwrap_or_else(|| panic!("no step named {name}"))
    }

    // ========================================================================
    // Step Selection
    // ========================================================================

    #[test]
    fn selection_is_a_pure_function_of_configuration() {
        let pipeline = scaffold_pipeline().unwrap();
        let a = pipeline.plan(&config(|o| o.webpack = true));
        let b = pipeline.plan(&config(|o| o.webpack = true));
        assert_eq!(a, b);
    }

    #[test]
    fn defaults_run_git_and_deploy_steps() {
        let plan = scaffold_pipeline().unwrap().plan(&config(|_| {}));
        assert!(runs(&plan, "init_git"));
        assert!(runs(&plan, "create_deploy_apps"));
        assert!(!runs(&plan, "create_code_host_repo"));
        assert!(!runs(&plan, "push_to_origin"));
        assert!(!runs(&plan, "add_webpack_pack"));
    }

    #[test]
    fn skip_deploy_skips_only_deploy_step() {
        let plan = scaffold_pipeline()
            .unwrap()
            .plan(&config(|o| o.skip_deploy_provisioning = true));
        assert!(!runs(&plan, "create_deploy_apps"));
        assert!(runs(&plan, "initial_commit"));
    }

    // ========================================================================
    // Branch Policy
    // ========================================================================

    #[test]
    fn postgresql_renders_database_template() {
        let plan = scaffold_pipeline().unwrap().plan(&config(|_| {}));
        let row = plan
            .iter()
            .find(|p| p.name == "use_database_config_template")
            .unwrap();
        assert_eq!(
            row.actions,
            vec!["render config/postgresql.yml -> config/database.yml".to_string()]
        );
    }

    #[test]
    fn mysql_has_no_database_arm() {
        let plan = scaffold_pipeline()
            .unwrap()
            .plan(&config(|o| o.database = "mysql".into()));
        let row = plan
            .iter()
            .find(|p| p.name == "use_database_config_template")
            .unwrap();
        assert!(row.actions.is_empty());
        assert!(runs(&plan, "create_database"));
    }

    #[test]
    fn unrecognized_css_framework_plans_no_actions() {
        let plan = scaffold_pipeline()
            .unwrap()
            .plan(&config(|o| o.css_framework = Some("material".into())));
        let row = plan.iter().find(|p| p.name == "setup_css_framework").unwrap();
        assert!(row.actions.is_empty());
        assert!(row.note.as_deref().unwrap().contains("unrecognized"));
    }

    // ========================================================================
    // Catalog Integrity
    // ========================================================================

    #[test]
    fn catalog_pipelines_build() {
        assert!(scaffold_pipeline().is_ok());
        assert!(setup_pipeline().is_ok());
        assert!(catalog::pipeline_named("nope").is_none());
    }
}
