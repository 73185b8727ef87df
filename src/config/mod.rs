//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `FLASHMATCH_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_DEBUG_FEATURE_LIMIT, DEFAULT_PARSER_TIMEOUT_SECS};
use crate::ranking::{DEFAULT_DIVERSITY_CAP, DEFAULT_RESULT_CAP, RankingConfig};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `FLASHMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// JSON array of feature names. Default: `./MLmodel/model_columns.json`.
    pub schema_path: PathBuf,

    /// JSON forest export. Default: `./MLmodel/matchmaker_model.json`.
    pub model_path: PathBuf,

    /// Parsing service base URL. Default: `http://127.0.0.1:3001`.
    pub parser_url: String,

    /// Parsing service request timeout. Default: 60 seconds.
    pub parser_timeout: Duration,

    /// Demo profiles loaded at startup. Default: the built-in set in
    /// `data/demo_profiles.json`.
    pub seed_profiles_path: Option<PathBuf>,

    /// Directory of synthetic `*.json` samples for `/api/profiles/seed`.
    pub synthetic_dir: Option<PathBuf>,

    /// JSON array of `{id, name}` display names.
    pub identity_path: Option<PathBuf>,

    /// Allowed CORS origins; `*` allows any. Default: `*`.
    pub cors_allow_origins: Vec<String>,

    /// Size of the category-unique first ranking pass. Default: `10`.
    pub diversity_cap: usize,

    /// Maximum matches returned. Default: `25`.
    pub result_cap: usize,

    /// Activated features echoed per match. Default: `40`.
    pub debug_feature_limit: usize,
}

pub const DEFAULT_SCHEMA_PATH: &str = "./MLmodel/model_columns.json";
pub const DEFAULT_MODEL_PATH: &str = "./MLmodel/matchmaker_model.json";
pub const DEFAULT_PARSER_URL: &str = "http://127.0.0.1:3001";
pub const ANY_ORIGIN: &str = "*";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            parser_url: DEFAULT_PARSER_URL.to_string(),
            parser_timeout: Duration::from_secs(DEFAULT_PARSER_TIMEOUT_SECS),
            seed_profiles_path: None,
            synthetic_dir: None,
            identity_path: None,
            cors_allow_origins: vec![ANY_ORIGIN.to_string()],
            diversity_cap: DEFAULT_DIVERSITY_CAP,
            result_cap: DEFAULT_RESULT_CAP,
            debug_feature_limit: DEFAULT_DEBUG_FEATURE_LIMIT,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "FLASHMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "FLASHMATCH_BIND_ADDR";
    const ENV_SCHEMA_PATH: &'static str = "FLASHMATCH_SCHEMA_PATH";
    const ENV_MODEL_PATH: &'static str = "FLASHMATCH_MODEL_PATH";
    const ENV_PARSER_URL: &'static str = "FLASHMATCH_PARSER_URL";
    const ENV_PARSER_TIMEOUT_SECS: &'static str = "FLASHMATCH_PARSER_TIMEOUT_SECS";
    const ENV_SEED_PROFILES_PATH: &'static str = "FLASHMATCH_SEED_PROFILES_PATH";
    const ENV_SYNTHETIC_DIR: &'static str = "FLASHMATCH_SYNTHETIC_DIR";
    const ENV_IDENTITY_PATH: &'static str = "FLASHMATCH_IDENTITY_PATH";
    const ENV_CORS_ALLOW_ORIGINS: &'static str = "FLASHMATCH_CORS_ALLOW_ORIGINS";
    const ENV_DIVERSITY_CAP: &'static str = "FLASHMATCH_DIVERSITY_CAP";
    const ENV_RESULT_CAP: &'static str = "FLASHMATCH_RESULT_CAP";
    const ENV_DEBUG_FEATURE_LIMIT: &'static str = "FLASHMATCH_DEBUG_FEATURE_LIMIT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let schema_path = Self::parse_path_from_env(Self::ENV_SCHEMA_PATH, defaults.schema_path);
        let model_path = Self::parse_path_from_env(Self::ENV_MODEL_PATH, defaults.model_path);
        let parser_url = Self::parse_string_from_env(Self::ENV_PARSER_URL, defaults.parser_url);
        let parser_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_PARSER_TIMEOUT_SECS,
            defaults.parser_timeout.as_secs(),
        ));
        let seed_profiles_path = Self::parse_optional_path_from_env(Self::ENV_SEED_PROFILES_PATH);
        let synthetic_dir = Self::parse_optional_path_from_env(Self::ENV_SYNTHETIC_DIR);
        let identity_path = Self::parse_optional_path_from_env(Self::ENV_IDENTITY_PATH);
        let cors_allow_origins =
            Self::parse_list_from_env(Self::ENV_CORS_ALLOW_ORIGINS, defaults.cors_allow_origins);
        let diversity_cap =
            Self::parse_u64_from_env(Self::ENV_DIVERSITY_CAP, defaults.diversity_cap as u64)
                as usize;
        let result_cap =
            Self::parse_u64_from_env(Self::ENV_RESULT_CAP, defaults.result_cap as u64) as usize;
        let debug_feature_limit = Self::parse_u64_from_env(
            Self::ENV_DEBUG_FEATURE_LIMIT,
            defaults.debug_feature_limit as u64,
        ) as usize;

        Ok(Self {
            port,
            bind_addr,
            schema_path,
            model_path,
            parser_url,
            parser_timeout,
            seed_profiles_path,
            synthetic_dir,
            identity_path,
            cors_allow_origins,
            diversity_cap,
            result_cap,
            debug_feature_limit,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_file(&self.schema_path)?;
        Self::require_file(&self.model_path)?;

        if let Some(ref path) = self.seed_profiles_path {
            Self::require_file(path)?;
        }
        if let Some(ref path) = self.identity_path {
            Self::require_file(path)?;
        }
        if let Some(ref path) = self.synthetic_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.diversity_cap == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_DIVERSITY_CAP,
                value: "0".into(),
            });
        }
        if self.result_cap == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_RESULT_CAP,
                value: "0".into(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn ranking(&self) -> RankingConfig {
        RankingConfig::new(self.diversity_cap, self.result_cap)
    }

    /// File name of the model artifact, for debug payloads.
    pub fn model_artifact_name(&self) -> String {
        self.model_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.model_path.display().to_string())
    }

    fn require_file(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        let values: Vec<String> = env::var(var_name)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if values.is_empty() { default } else { values }
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
