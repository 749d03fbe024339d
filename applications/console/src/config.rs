/// Console configuration
use cadence_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory (any supported extension)
pub const DEFAULT_CONFIG_FILE: &str = "cadence";

/// Environment variable prefix, nested keys are joined with `__`
pub const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Start from the built-in demo songs and playlists
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,

    /// JSON library snapshot replacing the demo content
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Playback clock resolution of the simulated engine
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// When false, every `play()` is rejected like a blocked browser autoplay
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
}

impl ConsoleConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `cadence.toml` (or another
    /// supported extension) in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, Self::environment())
    }

    /// Load with a specific environment source
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> anyhow::Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path.to_path_buf())),
            None => settings.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        // Override with environment variables (prefixed with CADENCE_)
        settings = settings.add_source(env);

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Environment source, e.g. `CADENCE_PLAYBACK__INITIAL_VOLUME=0.5`
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.engine.tick_interval_ms == 0 {
            anyhow::bail!("engine.tick_interval_ms must be positive");
        }
        if !self.playback.seek_step_secs.is_finite() || self.playback.seek_step_secs <= 0.0 {
            anyhow::bail!("playback.seek_step_secs must be a positive number of seconds");
        }
        Ok(())
    }
}

// Default values
fn default_seed_defaults() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    250
}

fn default_autoplay() -> bool {
    true
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            seed_defaults: default_seed_defaults(),
            seed_file: None,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            autoplay: default_autoplay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<config::Map<String, String>>();
        ConsoleConfig::environment().source(Some(map))
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let config = ConsoleConfig::load_with_env(None, env(&[])).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert!((config.playback.initial_volume - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.engine.tick_interval_ms, 250);
        assert!(config.library.seed_defaults);
    }

    #[test]
    fn file_values_are_read() {
        let file = write_config(
            r#"
            [playback]
            initial_volume = 0.4
            shuffle = true
            shuffle_seed = 7

            [engine]
            autoplay = false
            "#,
        );

        let config = ConsoleConfig::load_with_env(Some(file.path()), env(&[])).unwrap();
        assert!((config.playback.initial_volume - 0.4).abs() < f32::EPSILON);
        assert!(config.playback.shuffle);
        assert_eq!(config.playback.shuffle_seed, Some(7));
        assert!(!config.engine.autoplay);
        assert_eq!(config.engine.tick_interval_ms, 250);
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config("[playback]\nrepeat = false\n");

        let config = ConsoleConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("CADENCE_PLAYBACK__REPEAT", "true"),
                ("CADENCE_ENGINE__TICK_INTERVAL_MS", "100"),
            ]),
        )
        .unwrap();

        assert!(config.playback.repeat);
        assert_eq!(config.engine.tick_interval_ms, 100);
    }

    #[test]
    fn missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(ConsoleConfig::load_with_env(Some(&path), env(&[])).is_err());
    }

    #[test]
    fn zero_tick_is_rejected() {
        let file = write_config("[engine]\ntick_interval_ms = 0\n");
        assert!(ConsoleConfig::load_with_env(Some(file.path()), env(&[])).is_err());
    }
}
