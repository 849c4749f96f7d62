//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "scaffold a project" or "set up a checkout".

pub mod pipeline_runner;
pub mod resolver;
pub mod scaffold_service;
pub mod setup_service;
pub mod template_service;

pub use pipeline_runner::PipelineRunner;
pub use resolver::ConfigurationResolver;
pub use scaffold_service::{ScaffoldRequest, ScaffoldService};
pub use setup_service::SetupService;
pub use template_service::{TemplateInfo, TemplateService};
