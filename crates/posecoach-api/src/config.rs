//! API server configuration.

use posecoach_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `POSECOACH_HTTP__BIND_ADDR`.
pub const ENV_PREFIX: &str = "POSECOACH";

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// HTTP server configuration
    pub http: HttpConfig,

    /// Defaults for new feedback sessions
    pub session: SessionConfig,

    /// Dataset logging
    pub dataset: DatasetConfig,

    /// Voice announcements
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub bind_addr: SocketAddr,

    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Exercise used when a client configures without naming one
    pub default_exercise: String,

    /// Visibility cutoff for required joints; unset disables gating
    pub min_visibility: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Default for clients that do not send `log_enabled`
    pub enabled: bool,

    /// Directory receiving one CSV file per exercise
    pub out_dir: PathBuf,

    /// Keep every Nth processed frame
    pub sample_every: u32,

    /// Samples waiting to be written before new ones are dropped
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub enabled: bool,

    /// Speech rate (words per minute)
    pub rate: u32,

    /// Volume (0.0 - 1.0)
    pub volume: f32,

    /// Pending announcements before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_exercise: "Squat".to_string(),
            min_visibility: None,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            out_dir: PathBuf::from("data"),
            sample_every: 5,
            queue_capacity: 256,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rate: 185,
            volume: 1.0,
            queue_capacity: 32,
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("http.allowed_origins")
}

fn config_error(e: config::ConfigError) -> Error {
    Error::Config(e.to_string())
}

impl ApiConfig {
    /// Load configuration from file, with environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()
            .map_err(config_error)?;

        settings.try_deserialize().map_err(config_error)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(environment())
            .build()
            .map_err(config_error)?;

        settings.try_deserialize().map_err(config_error)
    }

    /// File when given, environment otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(min) = self.session.min_visibility {
            if !(0.0..=1.0).contains(&min) {
                return Err(Error::Config(format!(
                    "session.min_visibility must be within [0, 1], got {min}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.voice.volume) {
            return Err(Error::Config(format!(
                "voice.volume must be within [0, 1], got {}",
                self.voice.volume
            )));
        }
        if self.dataset.queue_capacity == 0 {
            return Err(Error::Config("dataset.queue_capacity must be positive".to_string()));
        }
        if self.voice.queue_capacity == 0 {
            return Err(Error::Config("voice.queue_capacity must be positive".to_string()));
        }
        posecoach_exercise::ExerciseKind::from_name(&self.session.default_exercise)?;
        Ok(())
    }
}
