//! Template stores.

mod directory;
mod memory;

pub use directory::DirectoryStore;
pub use memory::InMemoryStore;
