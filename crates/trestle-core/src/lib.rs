//! Trestle Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Trestle, the
//! opinionated Rails starter generator, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           trestle-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, SetupService, ...)   │
//! │   PipelineRunner interprets the steps   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Templates, Commands, ...)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    trestle-adapters (Infrastructure)    │
//! │ (LocalFilesystem, ProcessRunner, etc)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Configuration, Step, Pipeline, Smtp)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use trestle_core::{
//!     application::{NoProgress, ScaffoldRequest, ScaffoldService},
//!     domain::ScaffoldOptions,
//! };
//! # fn adapters() -> ScaffoldService { unimplemented!() }
//!
//! // 1. Collect options
//! let mut options = ScaffoldOptions::new("corner_shop");
//! options.css_framework = Some("bootstrap".into());
//!
//! // 2. Use application service (with injected adapters)
//! let service: ScaffoldService = adapters();
//! let report = service
//!     .scaffold(options, Path::new("corner_shop"), ScaffoldRequest::default(), &NoProgress)
//!     .unwrap();
//! println!("{} steps ran", report.executed().len());
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        PipelineRunner, ScaffoldRequest, ScaffoldService, SetupService, TemplateService,
        ports::{
            BaseGenerator, CommandRunner, CommandStatus, Filesystem, NoProgress,
            ProgressReporter, TemplateRenderer, TemplateStore, ToolProbe,
        },
    };
    pub use crate::domain::{
        Configuration, CssFramework, Database, Invocation, Pipeline, RenderContext, RunReport,
        ScaffoldOptions, SmtpSettings, Step, TemplateBody, TemplateId, Warning,
    };
    pub use crate::error::{TrestleError, TrestleResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
