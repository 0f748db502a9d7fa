use pref_core::game::{Rules, Variant};
use pref_core::model::{Seat, Topology};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_CONFIG_PATH: &str = "prefcount.yaml";
const DEFAULT_PLAYERS: usize = 3;

/// Root application configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_players")]
    pub players: usize,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            rules: RulesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: AppConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Like [`AppConfig::from_path`], but a missing file yields the defaults.
    pub fn from_path_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        let topology = Topology::for_players(self.players).map_err(|err| {
            ValidationError::InvalidField {
                field: "players".to_string(),
                message: err.to_string(),
            }
        })?;
        self.rules.validate(topology)?;
        self.logging.normalize()?;
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        self.rules.to_rules()
    }
}

fn default_players() -> usize {
    DEFAULT_PLAYERS
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RulesConfig {
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub mountain_adjustment: AdjustmentConfig,
}

impl RulesConfig {
    fn validate(&self, topology: Topology) -> Result<(), ValidationError> {
        let adjustment = &self.mountain_adjustment;
        if !adjustment.enabled {
            return Ok(());
        }
        topology
            .ensure_active(adjustment.seat)
            .map_err(|err| ValidationError::InvalidField {
                field: "rules.mountain_adjustment.seat".to_string(),
                message: err.to_string(),
            })
    }

    pub fn to_rules(&self) -> Rules {
        Rules {
            variant: self.variant,
            mountain_adjustment: self
                .mountain_adjustment
                .enabled
                .then_some(self.mountain_adjustment.seat),
        }
    }
}

/// Which seat absorbs an uneven mountain surplus.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AdjustmentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_adjust_seat")]
    pub seat: Seat,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seat: default_adjust_seat(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_adjust_seat() -> Seat {
    Seat::East
}

/// Console logging level plus an optional JSON log file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_tracing_level")]
    pub level: String,
    #[serde(default)]
    pub json_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_tracing_level(),
            json_file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            self.level = default_tracing_level();
        }
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.level".to_string(),
                message: format!("unknown level '{}'", self.level),
            });
        }
        if self
            .json_file
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            self.json_file = None;
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
