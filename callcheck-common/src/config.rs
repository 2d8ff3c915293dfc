//! Configuration loading and resolution
//!
//! Configuration file resolution follows the priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CALLCHECK_CONFIG` environment variable
//! 3. `callcheck.toml` in the working directory
//! 4. Compiled defaults (fallback)
//!
//! A config file may be partial: only the keys it names override the compiled
//! defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const ENV_CONFIG_PATH: &str = "CALLCHECK_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "callcheck.toml";

/// Configuration loading or validation error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Fixed campaign profile merged into every forwarded lead
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CampaignProfile {
    pub campid: String,
    pub roof_shade: String,
    pub solar_electric: String,
    pub property_ownership: String,
    pub credit_rating: String,
}

impl Default for CampaignProfile {
    fn default() -> Self {
        Self {
            campid: "BAB35AD7CF58F4F0".to_string(),
            roof_shade: "No Shade".to_string(),
            solar_electric: "TRUE".to_string(),
            property_ownership: "OWN".to_string(),
            credit_rating: "Good".to_string(),
        }
    }
}

/// Fixed voice-message template for the outbound verification call
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VoiceTemplate {
    /// Scripted message spoken to the lead
    pub body: String,
    pub lang: String,
    pub voice: String,
    /// Ask the provider to run answering-machine detection on the call
    pub machine_detection: u8,
}

impl Default for VoiceTemplate {
    fn default() -> Self {
        Self {
            body: "Hi, this is a test from Neel's machine.".to_string(),
            lang: "en-us".to_string(),
            voice: "female".to_string(),
            machine_detection: 1,
        }
    }
}

/// Process-wide configuration, constructed once at startup and shared
/// read-only across verification runs
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Listen address for the HTTP server
    pub bind_addr: String,
    /// Base URL of the voice provider's REST API
    pub voice_base_url: String,
    /// URL of the downstream lead receiver
    pub receiver_url: String,
    /// Seconds to wait between placing a call and querying its history.
    /// A fixed delay, not a poll: if the provider takes longer than this to
    /// record the call, Confirm fails the lead.
    pub confirm_delay_secs: u64,
    /// Per-request timeout for outbound calls, in seconds
    pub gateway_timeout_secs: u64,
    pub campaign: CampaignProfile,
    pub voice: VoiceTemplate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:40200".to_string(),
            voice_base_url: "https://rest.clicksend.com/v3".to_string(),
            receiver_url: "http://receiver.ceeleads.info/leads/post2".to_string(),
            confirm_delay_secs: 25,
            gateway_timeout_secs: 10,
            campaign: CampaignProfile::default(),
            voice: VoiceTemplate::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file; keys absent from the file keep
    /// their compiled defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve configuration following the priority order documented at the
    /// top of this module
    pub fn resolve(cli_arg: Option<&str>) -> Result<Self, ConfigError> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Self::load_from_file(Path::new(path));
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            return Self::load_from_file(Path::new(&path));
        }

        // Priority 3: Default config file in the working directory
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::load_from_file(default_path);
        }

        // Priority 4: Compiled defaults
        tracing::info!("No config file found, using compiled defaults");
        Ok(Self::default())
    }

    pub fn confirm_delay(&self) -> Duration {
        Duration::from_secs(self.confirm_delay_secs)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_compiled_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:40200");
        assert_eq!(config.confirm_delay_secs, 25);
        assert_eq!(config.gateway_timeout_secs, 10);
        assert_eq!(config.campaign.campid, "BAB35AD7CF58F4F0");
        assert_eq!(config.voice.machine_detection, 1);
    }

    #[test]
    fn test_partial_file_overrides_only_named_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "confirm_delay_secs = 1").unwrap();
        writeln!(file, "[campaign]").unwrap();
        writeln!(file, "campid = \"TEST\"").unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.confirm_delay_secs, 1);
        assert_eq!(config.campaign.campid, "TEST");
        // Everything else keeps its default
        assert_eq!(config.bind_addr, "127.0.0.1:40200");
        assert_eq!(config.campaign.roof_shade, "No Shade");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "confirm_delay_secs = \"not a number\"").unwrap();

        let result = AppConfig::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/callcheck.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
