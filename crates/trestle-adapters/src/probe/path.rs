use tracing::trace;
use trestle_core::application::ports::ToolProbe;

/// Looks tools up on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProbe;

impl PathProbe {
    pub fn new() -> Self {
        Self
    }
}

impl ToolProbe for PathProbe {
    fn is_available(&self, tool: &str) -> bool {
        match which::which(tool) {
            Ok(path) => {
                trace!(tool, path = %path.display(), "found");
                true
            }
            Err(_) => false,
        }
    }
}
