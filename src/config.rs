//! Service configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use crate::error::AppError;
use crate::model::ResourceKind;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Service Selection ===
    /// Which resource this process serves.
    #[serde(default)]
    pub resource: ResourceKind,

    /// Start with the built-in seed records.
    #[serde(default = "default_true")]
    pub seed: bool,

    // === Response Shape ===
    /// Wrap list/detail responses in a `data` envelope.
    /// Unset means "use the resource's default".
    #[serde(default)]
    pub envelope: Option<bool>,

    /// Answer with permissive CORS headers.
    /// Unset means "use the resource's default".
    #[serde(default)]
    pub cors: Option<bool>,

    // === Server Configuration ===
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Install the Prometheus recorder and expose `/metrics`.
    #[serde(default = "default_true")]
    pub metrics: bool,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource: ResourceKind::default(),
            seed: default_true(),
            envelope: None,
            cors: None,
            host: default_host(),
            port: default_port(),
            metrics: default_true(),
            rust_log: default_log_level(),
            verbose: false,
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Load configuration from explicit `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.port == 0 {
            return Err(AppError::InvalidConfig("PORT must be non-zero".to_string()));
        }

        if self.host.parse::<IpAddr>().is_err() {
            return Err(AppError::InvalidConfig(format!(
                "HOST must be an IP address, got {:?}",
                self.host
            )));
        }

        Ok(())
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("invalid HOST {:?}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Effective response envelope setting.
    pub fn envelope_enabled(&self) -> bool {
        self.envelope.unwrap_or(self.resource.default_envelope())
    }

    /// Effective CORS setting.
    pub fn cors_enabled(&self) -> bool {
        self.cors.unwrap_or(self.resource.default_cors())
    }
}
