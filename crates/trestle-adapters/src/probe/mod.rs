//! Tool probes for precondition checks.

mod path;
mod fixed;

pub use fixed::StaticProbe;
pub use path::PathProbe;
