//! Configuration file loading.
//!
//! Settings live in `review.toml`; every key is optional and a missing
//! file yields the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quality::Thresholds;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReviewConfig {
    /// Engine command line, e.g. `"stockfish"` or `"/opt/sf/stockfish --threads 2"`.
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Bound on the `uci`/`isready` handshake.
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
    #[serde(default)]
    pub review: ReviewSettings,
    #[serde(default)]
    pub live: LiveSettings,
}

fn default_engine() -> String {
    "stockfish".to_string()
}

fn default_handshake_timeout_ms() -> u64 {
    5_000
}

/// Post-game review settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewSettings {
    /// Search depth per position.
    pub depth: u32,
    /// Per-position evaluation timeout in milliseconds.
    pub timeout_ms: u64,
    /// Ranked lines requested per position.
    pub lines: u32,
    /// Best/second-best gap (centipawns) above which a position is critical.
    pub critical_swing: i32,
    /// Best-line scores assumed before the first move is evaluated.
    pub prior: [i32; 2],
    pub thresholds: Thresholds,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            depth: 14,
            timeout_ms: 15_000,
            lines: 2,
            critical_swing: 200,
            prior: [20, 15],
            thresholds: Thresholds::default(),
        }
    }
}

impl ReviewSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Live analysis settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LiveSettings {
    /// Start continuous analysis whenever a position is entered.
    pub continuous: bool,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self { continuous: true }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
            review: ReviewSettings::default(),
            live: LiveSettings::default(),
        }
    }
}

impl ReviewConfig {
    /// Loads `review.toml` from the current directory, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    /// Loads the given file, or defaults if it does not exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses and validates TOML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the default path to the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("review.toml")
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.trim().is_empty() {
            return Err(ConfigError::Invalid("engine command is empty".to_string()));
        }
        if self.review.depth == 0 {
            return Err(ConfigError::Invalid("review.depth must be at least 1".to_string()));
        }
        if self.review.lines < 2 {
            return Err(ConfigError::Invalid(
                "review.lines must be at least 2 to detect critical positions".to_string(),
            ));
        }
        if self.review.timeout_ms == 0 {
            return Err(ConfigError::Invalid("review.timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ReviewConfig::default();
        assert_eq!(config.engine, "stockfish");
        assert_eq!(config.review.depth, 14);
        assert_eq!(config.review.lines, 2);
        assert_eq!(config.review.prior, [20, 15]);
        assert_eq!(config.review.critical_swing, 200);
        assert_eq!(config.review.thresholds, Thresholds::default());
        assert!(config.live.continuous);
    }

    #[test]
    fn parse_partial_toml() {
        let config = ReviewConfig::parse(
            r#"
engine = "/usr/bin/stockfish"

[review]
depth = 18
timeout_ms = 30000

[review.thresholds]
blunder = 200

[live]
continuous = false
"#,
        )
        .unwrap();

        assert_eq!(config.engine, "/usr/bin/stockfish");
        assert_eq!(config.review.depth, 18);
        assert_eq!(config.review.timeout(), Duration::from_secs(30));
        assert_eq!(config.review.lines, 2);
        assert_eq!(config.review.thresholds.blunder, 200);
        assert_eq!(config.review.thresholds.mistake, 80);
        assert!(!config.live.continuous);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ReviewConfig::parse("").unwrap(), ReviewConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            ReviewConfig::parse("[review]\nlines = 1"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ReviewConfig::parse("[review]\ndepth = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ReviewConfig::parse("engine = \"\""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        assert!(matches!(
            ReviewConfig::parse("[review\ndepth = 3"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn load_from_file_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine = \"sf\"\n[review]\ndepth = 9").unwrap();
        let config = ReviewConfig::load_from(file.path()).unwrap();
        assert_eq!(config.engine, "sf");
        assert_eq!(config.review.depth, 9);

        let missing = ReviewConfig::load_from("/nonexistent/review.toml").unwrap();
        assert_eq!(missing, ReviewConfig::default());
    }
}
