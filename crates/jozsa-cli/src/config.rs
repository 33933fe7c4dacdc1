//! CLI configuration.
//!
//! Values are resolved in this order, later sources winning:
//!
//! ```text
//!   defaults ──→ YAML file ──→ JOZSA_* env ──→ command-line flags
//! ```
//!
//! The file is `--config <path>` when given, otherwise
//! `~/.jozsa/config.yaml` if it exists.
//!
//! ```yaml
//! shots: 2048
//! backend: ibm
//! target: ibm_torino
//! log_level: info
//! ibm:
//!   instance: ibm-q/open/main
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jozsa_adapter_sim::{DEFAULT_MAX_QUBITS, MAX_SUPPORTED_QUBITS};
use jozsa_algo::DEFAULT_SHOTS;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Directory under the home directory holding Jozsa state.
pub const CONFIG_DIR: &str = ".jozsa";

/// File name of the default configuration.
pub const CONFIG_FILE: &str = "config.yaml";

/// Backends the CLI knows how to build.
pub const KNOWN_BACKENDS: &[&str] = &["simulator", "sim", "ibm"];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// IBM Quantum settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IbmSettings {
    /// REST endpoint override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Direct API token. Environment credentials are used when absent.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// `hub/group/project` for the legacy API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl fmt::Debug for IbmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmSettings")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("instance", &self.instance)
            .finish()
    }
}

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub shots: u32,
    pub backend: String,
    pub target: Option<String>,
    pub seed: Option<u64>,
    pub log_level: Option<String>,
    pub max_qubits: u32,
    pub ibm: IbmSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            backend: "simulator".into(),
            target: None,
            seed: None,
            log_level: None,
            max_qubits: DEFAULT_MAX_QUBITS,
            ibm: IbmSettings::default(),
        }
    }
}

impl Config {
    /// `~/.jozsa/config.yaml`, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from file and process environment, then validate.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let source = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        };
        let mut config = match &source {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;

        debug!(
            file = ?source,
            backend = %config.backend,
            shots = config.shots,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse a YAML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse YAML text. An empty document yields the defaults.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml_ng::Error> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(source)
    }

    /// Apply `JOZSA_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("JOZSA_SHOTS") {
            self.shots = parse_env("JOZSA_SHOTS", &v)?;
        }
        if let Some(v) = get("JOZSA_BACKEND") {
            self.backend = v;
        }
        if let Some(v) = get("JOZSA_TARGET") {
            self.target = Some(v);
        }
        if let Some(v) = get("JOZSA_SEED") {
            self.seed = Some(parse_env("JOZSA_SEED", &v)?);
        }
        if let Some(v) = get("JOZSA_LOG_LEVEL") {
            self.log_level = Some(v);
        }
        if let Some(v) = get("JOZSA_MAX_QUBITS") {
            self.max_qubits = parse_env("JOZSA_MAX_QUBITS", &v)?;
        }
        Ok(())
    }

    /// Reject values no command can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::Invalid("shots must be positive".into()));
        }
        if self.max_qubits == 0 {
            return Err(ConfigError::Invalid("max_qubits must be positive".into()));
        }
        if self.max_qubits > MAX_SUPPORTED_QUBITS {
            return Err(ConfigError::Invalid(format!(
                "max_qubits must be at most {MAX_SUPPORTED_QUBITS}, got {}",
                self.max_qubits
            )));
        }
        let backend = self.backend.to_lowercase();
        if !KNOWN_BACKENDS.contains(&backend.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown backend '{}'. Available: simulator, ibm",
                self.backend
            )));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}
