use crate::pipeline::ranking::DEFAULT_TOP_N;
use crate::pipeline::scoring::PriorityWeights;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            scoring: ScoringConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Priority weights and board size used by the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub weights: PriorityWeights,
    pub top_n: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: PriorityWeights::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl ScoringConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = PriorityWeights::default();

        let weights = PriorityWeights {
            value_weight: weight_from_env("LEAD_VALUE_WEIGHT", defaults.value_weight)?,
            sla_weight: weight_from_env("LEAD_SLA_WEIGHT", defaults.sla_weight)?,
            urgency_weight: weight_from_env("LEAD_URGENCY_WEIGHT", defaults.urgency_weight)?,
            value_baseline: weight_from_env("LEAD_VALUE_BASELINE", defaults.value_baseline)?,
            contacted_weight: weight_from_env("LEAD_CONTACTED_WEIGHT", defaults.contacted_weight)?,
            inspection_weight: weight_from_env(
                "LEAD_INSPECTION_WEIGHT",
                defaults.inspection_weight,
            )?,
            estimate_weight: weight_from_env("LEAD_ESTIMATE_WEIGHT", defaults.estimate_weight)?,
        };

        if weights.value_baseline <= 0.0 {
            return Err(ConfigError::InvalidWeight {
                key: "LEAD_VALUE_BASELINE",
            });
        }

        let top_n = match env::var("LEAD_TOP_N") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidTopN)?,
            Err(_) => DEFAULT_TOP_N,
        };

        Ok(Self { weights, top_n })
    }
}

fn weight_from_env(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidWeight { key }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeight { key: &'static str },
    InvalidTopN,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeight { key } => {
                write!(f, "{key} must be a non-negative number")
            }
            ConfigError::InvalidTopN => write!(f, "LEAD_TOP_N must be a non-negative integer"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWeight { .. }
            | ConfigError::InvalidTopN => None,
        }
    }
}
