//! Configuration management for refstore

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::reference::GrantScope;

/// Default TTL for reference stores (3 hours)
pub const DEFAULT_REFERENCE_TTL_SECS: u64 = 3 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Console API base URL (e.g. `https://console-api.example.com`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Bearer token for the console API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Active workspace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    /// Grant scope of the current session
    #[serde(default)]
    pub scope: GrantScope,

    /// Reference cache tuning
    #[serde(default)]
    pub reference: ReferenceSettings,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Tuning knobs for reference stores and the batched fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSettings {
    /// How long a loaded reference store stays fresh
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Pending ids that trigger an immediate batch flush
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Debounce window before a partial batch is flushed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum ids per list request in a batch flush
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Maximum chunk requests in flight at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// TTL of cached list responses in the client wrapper
    #[serde(default = "default_response_ttl_secs")]
    pub response_ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_REFERENCE_TTL_SECS
}

fn default_batch_size() -> usize {
    10
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_chunk_size() -> usize {
    30
}

fn default_max_concurrent() -> usize {
    8
}

fn default_response_ttl_secs() -> u64 {
    60
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            batch_size: default_batch_size(),
            debounce_ms: default_debounce_ms(),
            chunk_size: default_chunk_size(),
            max_concurrent: default_max_concurrent(),
            response_ttl_secs: default_response_ttl_secs(),
        }
    }
}

impl ReferenceSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn response_ttl(&self) -> Duration {
        Duration::from_secs(self.response_ttl_secs)
    }

    /// Reject settings that would stall or spin the batched fetcher
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("reference.batch_size must be > 0".into()).into());
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("reference.chunk_size must be > 0".into()).into());
        }
        if self.max_concurrent == 0 {
            return Err(
                ConfigError::Invalid("reference.max_concurrent must be > 0".into()).into(),
            );
        }
        Ok(())
    }
}

/// User preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".refstore").join("config.yaml"))
    }

    /// Resolve an optional override to a concrete path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional override path
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.reference.validate()?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // The file holds an API token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Validate that required connection settings are present
    pub fn validate_auth(&self) -> Result<()> {
        if self.api_host.is_none() {
            return Err(ConfigError::MissingApiHost.into());
        }
        if self.api_token.is_none() {
            return Err(ConfigError::MissingApiToken.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_host.is_none());
        assert!(config.api_token.is_none());
        assert_eq!(config.scope, GrantScope::Workspace);
        assert_eq!(config.reference.ttl(), Duration::from_secs(3 * 60 * 60));
        assert_eq!(config.reference.batch_size, 10);
        assert_eq!(config.reference.debounce(), Duration::from_millis(300));
        assert_eq!(config.reference.chunk_size, 30);
    }

    #[test]
    fn test_partial_reference_section_uses_defaults() {
        let yaml = "api_host: http://localhost\nscope: USER\nreference:\n  ttl_secs: 60\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.scope, GrantScope::User);
        assert_eq!(config.reference.ttl_secs, 60);
        assert_eq!(config.reference.chunk_size, 30);
        assert_eq!(config.reference.debounce_ms, 300);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config {
            api_host: Some("http://localhost:8080".to_string()),
            api_token: Some("secret".to_string()),
            workspace_id: Some("ws-1".to_string()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_host.as_deref(), Some("http://localhost:8080"));
        assert_eq!(loaded.workspace_id.as_deref(), Some("ws-1"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load_from(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let settings = ReferenceSettings {
            chunk_size: 0,
            ..ReferenceSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_auth() {
        let mut config = Config::default();
        assert!(config.validate_auth().is_err());

        config.api_host = Some("http://localhost".to_string());
        assert!(matches!(
            config.validate_auth(),
            Err(crate::error::Error::Config(ConfigError::MissingApiToken))
        ));

        config.api_token = Some("t".to_string());
        assert!(config.validate_auth().is_ok());
    }
}
