//! Built-in pipelines.
//!
//! Each pipeline is plain data assembled from [`Step`](super::Step) records;
//! adding a step means registering one more record at the right position.

mod scaffold;
mod setup;

pub use scaffold::{SCAFFOLD_PIPELINE, scaffold_pipeline};
pub use setup::{SETUP_PIPELINE, setup_pipeline};

use crate::domain::{entities::pipeline::Pipeline, error::DomainError};

/// Look up a built-in pipeline by name.
pub fn pipeline_named(name: &str) -> Option<Result<Pipeline, DomainError>> {
    match name {
        SCAFFOLD_PIPELINE => Some(scaffold_pipeline()),
        SETUP_PIPELINE => Some(setup_pipeline()),
        _ => None,
    }
}
