//! Instrument configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use th_engine::{FrequencyRange, Key, OutputMode, Scale, DEFAULT_OCTAVES, SAMPLE_RATE};

/// Error loading or validating a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    Io(std::io::Error),
    /// TOML didn't parse
    Parse(toml::de::Error),
    /// A value is out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Config read error: {}", e),
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Startup settings. Every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentConfig {
    pub sample_rate: u32,
    /// Lowest frequency on the control surface (Hz)
    pub freq_min: f64,
    /// Highest frequency on the control surface (Hz)
    pub freq_max: f64,
    /// Master volume slider position, 1 to 10 (applied log10)
    pub master_volume: f64,
    pub initial_mode: OutputMode,
    pub initial_scale: Scale,
    pub initial_key: Key,
    /// Octaves in the note table
    pub octaves: usize,
    /// Device ring buffer length
    pub buffer_ms: u32,
    /// Sleep between checks while paused
    pub idle_poll_ms: u64,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            freq_min: 20.0,
            freq_max: 2000.0,
            master_volume: 7.2,
            initial_mode: OutputMode::Continuous,
            initial_scale: Scale::Chromatic,
            initial_key: Key::C,
            octaves: DEFAULT_OCTAVES,
            buffer_ms: 100,
            idle_poll_ms: 10,
        }
    }
}

impl InstrumentConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid("sample_rate must be positive".into()));
        }
        if !(self.freq_min > 0.0 && self.freq_min < self.freq_max && self.freq_max.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "frequency range {}..{} is empty or non-positive",
                self.freq_min, self.freq_max
            )));
        }
        if !(1.0..=10.0).contains(&self.master_volume) {
            return Err(ConfigError::Invalid(format!(
                "master_volume {} outside 1..=10",
                self.master_volume
            )));
        }
        if self.octaves == 0 {
            return Err(ConfigError::Invalid("octaves must be at least 1".into()));
        }
        Ok(())
    }

    pub fn frequency_range(&self) -> FrequencyRange {
        FrequencyRange::new(self.freq_min, self.freq_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = InstrumentConfig::from_toml_str("").unwrap();
        assert_eq!(config, InstrumentConfig::default());
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.frequency_range(), FrequencyRange::new(20.0, 2000.0));
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = InstrumentConfig::from_toml_str(
            r#"
            freq_max = 1200.0
            initial_mode = "discrete"
            initial_scale = "pentatonic minor"
            initial_key = "F#"
            "#,
        )
        .unwrap();
        assert_eq!(config.freq_max, 1200.0);
        assert_eq!(config.initial_mode, OutputMode::Discrete);
        assert_eq!(config.initial_scale, Scale::PentatonicMinor);
        assert_eq!(config.initial_key, Key::FSharp);
        assert_eq!(config.freq_min, 20.0);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = InstrumentConfig::from_toml_str("freq_min = 3000.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_master_volume_out_of_range() {
        let err = InstrumentConfig::from_toml_str("master_volume = 0.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_scale() {
        let err = InstrumentConfig::from_toml_str(r#"initial_scale = "lydian""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theremin.toml");
        std::fs::write(&path, "octaves = 9\nidle_poll_ms = 5\n").unwrap();
        let config = InstrumentConfig::load(&path).unwrap();
        assert_eq!(config.octaves, 9);
        assert_eq!(config.idle_poll_ms, 5);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = InstrumentConfig {
            initial_key: Key::ASharp,
            ..InstrumentConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(InstrumentConfig::from_toml_str(&text).unwrap(), config);
    }
}
