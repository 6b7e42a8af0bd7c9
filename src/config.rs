use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fewest symbol types a board may use.
pub const MIN_TYPES: u8 = 3;

/// Largest symbol type a board may use; boards print one digit per cell.
pub const MAX_TYPES: u8 = 9;

/// Parameters of one game session, loadable from TOML.
///
/// Missing keys fall back to the defaults of the stock 6x6 level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Edge length of the square board.
    pub size: usize,
    /// Number of distinct symbol types; symbols are drawn from `1..=num_types`.
    pub num_types: u8,
    /// Move budget; one move is consumed per accepted swap.
    pub max_moves: u32,
    /// Score at which the session is won.
    pub target_score: u32,
    /// Only allow swapping orthogonal neighbours.
    pub adjacent_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            size: 6,
            num_types: 6,
            max_moves: 20,
            target_score: 5000,
            adjacent_only: false,
        }
    }
}

impl SessionConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: SessionConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.problem() {
            Some(msg) => Err(ConfigError::Validation(msg)),
            None => Ok(()),
        }
    }

    /// Describes the first invalid value, if any.
    pub(crate) fn problem(&self) -> Option<String> {
        if self.size < 3 {
            return Some("size must be >= 3".into());
        }
        // With two types a cell can be boxed in by a pair of each on both
        // axes, so match-free generation is not guaranteed to finish.
        if self.num_types < MIN_TYPES || self.num_types > MAX_TYPES {
            return Some(format!("num_types must be in [{}, {}]", MIN_TYPES, MAX_TYPES));
        }
        if self.max_moves == 0 {
            return Some("max_moves must be > 0".into());
        }
        if self.target_score == 0 {
            return Some("target_score must be > 0".into());
        }
        None
    }

    /// Generate a TOML string with all default values.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&SessionConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.size, 6);
        assert_eq!(config.num_types, 6);
        assert_eq!(config.max_moves, 20);
        assert_eq!(config.target_score, 5000);
        assert!(!config.adjacent_only);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
size = 8
adjacent_only = true
"#;
        let config: SessionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.size, 8);
        assert!(config.adjacent_only);
        assert_eq!(config.max_moves, 20);
    }

    #[test]
    fn test_validation_rejects_small_board() {
        let config = SessionConfig {
            size: 2,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_type_count() {
        let mut config = SessionConfig::default();
        config.num_types = 2;
        assert!(config.validate().is_err());
        config.num_types = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_budget() {
        let mut config = SessionConfig::default();
        config.max_moves = 0;
        assert!(config.validate().is_err());
        let mut config = SessionConfig::default();
        config.target_score = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = SessionConfig::load_or_default(Path::new("no_such_match3.toml")).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "max_moves = 5\ntarget_score = 900").unwrap();

        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.max_moves, 5);
        assert_eq!(config.target_score, 900);
        assert_eq!(config.size, 6);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "num_types = 1\n").unwrap();

        let err = SessionConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = SessionConfig::default_toml();
        let config: SessionConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, SessionConfig::default());
    }
}
