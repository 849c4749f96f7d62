//! Base project generators.
//!
//! The scaffold pipeline runs on top of a project the host framework's own
//! generator created. [`RailsGenerator`] shells out to `rails new`;
//! [`SkeletonGenerator`] writes the handful of files the pipeline edits and
//! is what tests use.

mod rails;
mod skeleton;

pub use rails::RailsGenerator;
pub use skeleton::SkeletonGenerator;
