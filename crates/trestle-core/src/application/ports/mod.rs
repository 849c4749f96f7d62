//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `trestle-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateStore` / `TemplateRenderer`: template bodies and substitution
//!   - `CommandRunner`: external processes
//!   - `ToolProbe`: precondition checks
//!   - `BaseGenerator`: the host framework's project generator
//!   - `ProgressReporter`: step and command announcements
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    BaseGenerator, CommandRunner, CommandStatus, Filesystem, NoProgress, ProgressReporter,
    TemplateRenderer, TemplateStore, ToolProbe,
};

#[cfg(test)]
pub use output::{
    MockBaseGenerator, MockCommandRunner, MockFilesystem, MockTemplateRenderer, MockTemplateStore,
    MockToolProbe,
};
