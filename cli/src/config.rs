//! Tool configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use vetting_jury::VettingParams;
use vetting_utils::LogFormat;

use crate::CliError;

/// Configuration for the `vetting` tool.
///
/// Loaded from a TOML file via [`VettingConfig::from_toml_file`]; command-line
/// flags and environment variables override individual fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VettingConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub lmdb_map_size: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Eligible juror pool for the local oracle. Empty means a generated pool.
    #[serde(default)]
    pub juror_pool: Vec<String>,

    /// Protocol parameters.
    #[serde(default)]
    pub params: VettingParams,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./vetting_data")
}

fn default_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl VettingConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CliError> {
        let config: Self = toml::from_str(s).map_err(|e| CliError::Config(e.to_string()))?;
        config
            .params
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, CliError> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

impl Default for VettingConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            lmdb_map_size: default_map_size(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            juror_pool: Vec::new(),
            params: VettingParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetting_types::{ApprovalThreshold, CommitScheme};

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = VettingConfig::default();
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = VettingConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = VettingConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.params.oracle_latency_buffer_secs, 300);
        assert_eq!(config.params.default_scheme, CommitScheme::Blake2b256);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"
            juror_pool = ["0x00000000000000000000000000000000000000aa"]

            [params]
            default_scheme = "keccak256"
            default_threshold = { at_least_bps = 6667 }
        "#;
        let config = VettingConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.juror_pool.len(), 1);
        assert_eq!(config.params.default_scheme, CommitScheme::Keccak256);
        assert_eq!(config.params.default_threshold, ApprovalThreshold::AtLeastBps(6667));
        assert_eq!(config.params.min_jury_size, 5); // default
    }

    #[test]
    fn invalid_params_are_a_config_error() {
        let result = VettingConfig::from_toml_str("[params]\nmin_jury_size = 4");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = VettingConfig::from_toml_file(Path::new("/nonexistent/vetting.toml"));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
