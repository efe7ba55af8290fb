use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::identity::SelfSignedIdentityProvider;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),
    #[error("config parse error: {0}")]
    ParseError(String),
    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeConfig {
    /// Subject alternative names written into each ephemeral certificate.
    pub subject_alt_names: Vec<String>,

    // Logging
    pub log_level: String,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            subject_alt_names: vec!["dtx.local".to_string()],
            log_level: "info".to_string(),
        }
    }
}

impl HandshakeConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let config: HandshakeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        info!(path = %path.display(), "loaded handshake config");
        Ok(config)
    }

    pub fn load_from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(names) = std::env::var("DTX_SUBJECT_ALT_NAMES") {
            config.subject_alt_names = names
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subject_alt_names.is_empty() {
            return Err(ConfigError::ValidationError(
                "subject_alt_names must contain at least one name".to_string(),
            ));
        }
        if self.subject_alt_names.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "subject_alt_names must not contain empty names".to_string(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "log_level must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn identity_provider(&self) -> SelfSignedIdentityProvider {
        SelfSignedIdentityProvider::new(self.subject_alt_names.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(HandshakeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_file_with_partial_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "subject_alt_names = [\"old-phone.local\", \"10.0.0.2\"]").unwrap();

        let config = HandshakeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.subject_alt_names, vec!["old-phone.local", "10.0.0.2"]);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = HandshakeConfig::load_from_file(Path::new("/nonexistent/dtx.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "subject_alt_names = 5").unwrap();
        assert!(matches!(
            HandshakeConfig::load_from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let config = HandshakeConfig {
            subject_alt_names: Vec::new(),
            ..HandshakeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let config = HandshakeConfig {
            subject_alt_names: vec![" ".to_string()],
            ..HandshakeConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
