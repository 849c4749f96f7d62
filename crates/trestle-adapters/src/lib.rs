//! Infrastructure adapters for Trestle.
//!
//! This crate implements the ports defined in `trestle_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod base;
pub mod builtin_templates;
pub mod filesystem;
pub mod probe;
pub mod process;
pub mod renderer;
pub mod template_store;

// Re-export commonly used adapters
pub use base::{RailsGenerator, SkeletonGenerator};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use probe::{PathProbe, StaticProbe};
pub use process::{ProcessRunner, RecordingRunner};
pub use renderer::SimpleRenderer;
pub use template_store::{DirectoryStore, InMemoryStore};
