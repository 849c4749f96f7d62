//! Application layer for Trestle.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, SetupService,
//!   TemplateService) and the PipelineRunner they share
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. Step selection and branching live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ConfigurationResolver, PipelineRunner, ScaffoldRequest, ScaffoldService, SetupService,
    TemplateInfo, // DTO for template listings
    TemplateService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    BaseGenerator, CommandRunner, CommandStatus, Filesystem, NoProgress, ProgressReporter,
    TemplateRenderer, TemplateStore, ToolProbe,
};

pub use error::ApplicationError;
