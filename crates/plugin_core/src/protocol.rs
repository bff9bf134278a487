use serde::Deserialize;
use serde_json::{Map, Value};

/// Named arguments handed to a plugin class constructor.
pub type ClassArgs = Map<String, Value>;

/// Metadata a plugin exposes for listing purposes.
///
/// Read from the `NAME` and `DESCRIPTION` class attributes of the first
/// class defined in a plugin file. Also the JSON document printed by the
/// plugin inspector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginDescriptor {
    /// Short identifier, unique among installed plugins of one kind.
    pub name: String,
    /// Human-readable sentence describing what the plugin does.
    pub description: String,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Time and memory limits applied to a plugin inspector process.
#[derive(Debug, Default, Clone, Copy)]
pub struct Limits {
    /// Maximum CPU time in milliseconds.
    pub cpu_ms: Option<u64>,
    /// Maximum memory in megabytes.
    pub mem_mb: Option<u64>,
}
