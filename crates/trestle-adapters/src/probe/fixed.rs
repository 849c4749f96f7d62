use std::collections::HashSet;

use trestle_core::application::ports::ToolProbe;

/// Probe with a fixed answer set.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    available: HashSet<String>,
    all: bool,
}

impl StaticProbe {
    /// Every tool is available.
    pub fn all() -> Self {
        Self {
            available: HashSet::new(),
            all: true,
        }
    }

    /// Only the listed tools are available.
    pub fn only(tools: &[&str]) -> Self {
        Self {
            available: tools.iter().map(|t| t.to_string()).collect(),
            all: false,
        }
    }
}

impl ToolProbe for StaticProbe {
    fn is_available(&self, tool: &str) -> bool {
        self.all || self.available.contains(tool)
    }
}
