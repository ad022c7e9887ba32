//! Configuration loading for the `meetings` CLI.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use meeting_engine::SchedulerConfig;

/// Environment variable prefix. Nested keys use `__`, e.g.
/// `MEETINGS_WORKING_HOURS__BUFFER_MINUTES=10`.
const ENV_PREFIX: &str = "MEETINGS_";

/// Load the scheduler configuration.
///
/// Later sources override earlier ones: built-in defaults, the user config
/// file (`<config dir>/meetings/config.toml`), `config_path`, then `MEETINGS_*`
/// environment variables.
pub fn load(config_path: Option<&Path>) -> Result<SchedulerConfig, figment::Error> {
    let mut figment = Figment::from(Serialized::defaults(SchedulerConfig::default()));

    if let Some(config_dir) = dirs_config_path() {
        figment = figment.merge(Toml::file(config_dir.join("config.toml")));
    }

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment.extract()
}

/// Returns the platform-specific config directory for meetings.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("meetings"))
}
