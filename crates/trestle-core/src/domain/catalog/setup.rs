//! The setup pipeline run inside a generated project (`trestle setup`, and
//! the generated `bin/setup`).

use crate::domain::{
    entities::{
        pipeline::Pipeline,
        step::{CommandSpec, Step, SubAction},
    },
    error::DomainError,
};

pub const SETUP_PIPELINE: &str = "setup";

pub fn setup_pipeline() -> Result<Pipeline, DomainError> {
    Pipeline::builder(SETUP_PIPELINE)
        .register(
            Step::actions(
                "install_dependencies",
                vec![
                    SubAction::command(
                        CommandSpec::new("gem").args(&["install", "bundler", "--conservative"]),
                    ),
                    SubAction::Ensure {
                        check: CommandSpec::new("bundle").args(&["check"]),
                        install: CommandSpec::new("bundle").args(&["install"]),
                    },
                ],
            )
            .announce("Installing dependencies"),
        )
        .register(
            Step::actions(
                "copy_env_file",
                vec![SubAction::copy_if_missing(".env.example", ".env")],
            )
            .announce("Copying .env sample file"),
        )
        .register(
            Step::actions(
                "prepare_database",
                vec![SubAction::command(
                    CommandSpec::new("bin/rails").args(&["db:setup"]),
                )],
            )
            .announce("Preparing database"),
        )
        .register(
            Step::actions(
                "install_commit_hooks",
                vec![SubAction::command(
                    CommandSpec::new("overcommit").args(&["--install"]),
                )],
            )
            .announce("Installing git pre-commit hooks"),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_steps_in_order() {
        let pipeline = setup_pipeline().unwrap();
        let names: Vec<_> = pipeline.steps().iter().map(Step::name).collect();
        assert_eq!(
            names,
            vec![
                "install_dependencies",
                "copy_env_file",
                "prepare_database",
                "install_commit_hooks"
            ]
        );
    }
}
