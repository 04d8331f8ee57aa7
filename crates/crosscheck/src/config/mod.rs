use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub ledger: LedgerSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("CROSSCHECK_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("CROSSCHECK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("CROSSCHECK_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("CROSSCHECK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let seed_dir = env::var("CROSSCHECK_SEED_DIR").ok().map(PathBuf::from);
        let link_property_from_lease = match env::var("CROSSCHECK_LEASE_LINKAGE") {
            Ok(raw) => parse_switch(&raw).ok_or(ConfigError::InvalidLinkage { value: raw })?,
            Err(_) => false,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            ledger: LedgerSettings {
                seed_dir,
                link_property_from_lease,
            },
        })
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
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
}

/// Settings consumed by the payment ledger wiring.
#[derive(Debug, Clone, Default)]
pub struct LedgerSettings {
    /// Directory of CSV files seeding landlords, tenants, payment types, and
    /// leases into the in-memory directory.
    pub seed_dir: Option<PathBuf>,
    /// When set, recorded payments are stamped with the property on the
    /// tenant's active lease.
    pub link_property_from_lease: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLinkage { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "CROSSCHECK_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "CROSSCHECK_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLinkage { value } => {
                write!(
                    f,
                    "CROSSCHECK_LEASE_LINKAGE must be on/off, got '{}'",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidLinkage { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
