pub mod common;
pub mod configuration;
pub mod pipeline;
pub mod run;
pub mod step;
pub mod template;

pub use crate::domain::DomainError;
pub use configuration::{Configuration, ScaffoldOptions};
pub use pipeline::Pipeline;
pub use step::Step;
