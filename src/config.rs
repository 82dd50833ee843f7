//! Layered configuration for the watch protocol.
//!
//! Sources, later wins:
//! - built-in defaults
//! - `watchwire.toml`, discovered from the current directory up the
//!   ancestor chain
//! - `WATCHWIRE_*` environment variables, with double underscores
//!   separating nested levels (`WATCHWIRE_PROTOCOL__GENERATION=json` sets
//!   `protocol.generation`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::client::WatchOptions;
use crate::codec::Generation;

const CONFIG_FILE: &str = "watchwire.toml";
const ENV_PREFIX: &str = "WATCHWIRE_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Watch protocol settings
    #[serde(default)]
    pub protocol: ProtocolConfig,

    /// Logging levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProtocolConfig {
    /// Wire-schema generation to speak at session open
    #[serde(default = "default_generation")]
    pub generation: Generation,

    /// Debounce override in milliseconds; unset means the generation default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,

    /// Watch directories recursively
    #[serde(default = "default_false")]
    pub recursive: bool,

    /// Capacity of host-side event channels
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_version() -> u32 {
    1
}
fn default_generation() -> Generation {
    Generation::Detailed
}
fn default_false() -> bool {
    false
}
fn default_channel_capacity() -> usize {
    64
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            protocol: ProtocolConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            generation: default_generation(),
            debounce_ms: None,
            recursive: false,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl ProtocolConfig {
    /// Watch options carrying this config's overrides.
    ///
    /// An unset debounce stays unset so the session applies the generation
    /// default at open time.
    pub fn options(&self) -> WatchOptions {
        WatchOptions {
            recursive: Some(self.recursive),
            debounce_ms: self.debounce_ms,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path =
            Self::find_config_file().unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels; single underscores
            // stay inside field names.
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Find `watchwire.toml` from the current directory up to root
    fn find_config_file() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        for ancestor in current.ancestors() {
            let candidate = ancestor.join(CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.protocol.generation, Generation::Detailed);
        assert!(settings.protocol.debounce_ms.is_none());
        assert_eq!(settings.logging.default, "warn");
    }

    #[test]
    fn load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);

        let toml_content = r#"
[protocol]
generation = "legacy"
debounce_ms = 250
recursive = true

[logging]
default = "info"

[logging.modules]
watchwire = "debug"
"#;
        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.protocol.generation, Generation::Legacy);
        assert_eq!(settings.protocol.debounce_ms, Some(250));
        assert!(settings.protocol.recursive);
        assert_eq!(settings.logging.default, "info");
        assert_eq!(settings.logging.modules["watchwire"], "debug");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);

        fs::write(&config_path, "[protocol]\ngeneration = \"json\"\n").unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.protocol.generation, Generation::Json);
        assert_eq!(settings.protocol.channel_capacity, 64);
        assert_eq!(settings.logging.default, "warn");
    }

    #[test]
    fn save_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);

        let mut settings = Settings::default();
        settings.protocol.generation = Generation::Legacy;
        settings.protocol.debounce_ms = Some(750);
        settings.save(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert_eq!(loaded.protocol.generation, Generation::Legacy);
        assert_eq!(loaded.protocol.debounce_ms, Some(750));
    }

    #[test]
    fn options_leave_unset_debounce_to_the_generation() {
        let config = ProtocolConfig::default();
        let options = config.options();
        assert_eq!(options.recursive, Some(false));
        assert!(options.debounce_ms.is_none());
    }
}
