//! Defaults for the CLI. Catalog location and search limits.

use std::path::PathBuf;

use serde::Deserialize;

/// Settings read from `RAINBOW_*` environment variables and, if
/// `RAINBOW_CONFIG` names one, a config file. Command-line flags win.
#[derive(Debug, Deserialize, Default)]
pub struct CliConfig {
    /// Catalog root directory. Read from RAINBOW_CATALOG.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Stop after this many schedules. Read from RAINBOW_MAX_SCHEDULES.
    #[serde(default)]
    pub max_schedules: Option<usize>,

    /// Stop after this many section placements. Read from RAINBOW_MAX_NODES.
    #[serde(default)]
    pub max_nodes: Option<usize>,
}

impl CliConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("RAINBOW_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment last so it overrides the file.
        c = c.add_source(config::Environment::with_prefix("RAINBOW").try_parsing(true));
        c.build()?.try_deserialize()
    }
}
