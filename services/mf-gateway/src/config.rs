//! Configuration for the StAR MF gateway

use anyhow::{Result, bail};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEMO_HOST: &str = "https://bsestarmfdemo.bseindia.com";

/// Gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Counterparty endpoints and call timeout
    pub counterparty: CounterpartyConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Monitoring configuration
    pub monitoring: MonitoringConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Whole-request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Enable response compression
    pub compression: bool,
}

/// Counterparty endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterpartyConfig {
    /// SOAP order entry service (lumpsum, SIP, XSIP)
    pub order_entry_url: String,
    /// Secure SOAP endpoint for `getPassword`
    pub password_url: String,
    /// Client master registration API
    pub ucc_url: String,
    /// Base URL of the enhanced JSON API
    pub enhanced_api_url: String,
    /// Two-factor ELOG endpoint
    pub elog_url: String,
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Allow credentials; must stay off when origins contain `*`
    pub allow_credentials: bool,
    /// Max age for preflight requests
    pub max_age_seconds: u64,
}

/// Monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Enable Prometheus metrics
    pub metrics_enabled: bool,
    /// Metrics endpoint path
    pub metrics_path: String,
    /// Health check endpoint path
    pub health_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            timeout_seconds: 60,
            max_body_size: 1024 * 1024, // 1MB
            compression: true,
        }
    }
}

impl Default for CounterpartyConfig {
    fn default() -> Self {
        Self {
            order_entry_url: format!("{DEMO_HOST}/MFOrderEntry/MFOrder.svc"),
            password_url: format!("{DEMO_HOST}/MFOrderEntry/MFOrder.svc/Secure"),
            ucc_url: format!("{DEMO_HOST}/StarMFCommonAPI/ClientMaster/Registration"),
            enhanced_api_url: format!("{DEMO_HOST}/StarMFAPI/api"),
            elog_url: format!("{DEMO_HOST}/BSEMFWEBAPI/api/_2FAELOGController/_2FAELOG/w"),
            timeout_seconds: 30,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec![
                "Content-Type".to_string(),
                "SOAPAction".to_string(),
                "X-Request-Id".to_string(),
            ],
            allow_credentials: false,
            max_age_seconds: 86400, // 24 hours
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            metrics_path: "/metrics".to_string(),
            health_path: "/api/v1/health".to_string(),
        }
    }
}

impl CounterpartyConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Full URL of an enhanced API operation
    #[must_use]
    pub fn enhanced_url(&self, path: &str) -> String {
        format!("{}{}", self.enhanced_api_url.trim_end_matches('/'), path)
    }

    fn urls(&self) -> [(&'static str, &str); 5] {
        [
            ("order_entry_url", &self.order_entry_url),
            ("password_url", &self.password_url),
            ("ucc_url", &self.ucc_url),
            ("enhanced_api_url", &self.enhanced_api_url),
            ("elog_url", &self.elog_url),
        ]
    }
}

impl GatewayConfig {
    /// Load configuration from file, with `GATEWAY__SECTION__KEY` overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("GATEWAY").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.timeout_seconds == 0 {
            bail!("server.timeout_seconds must be greater than zero");
        }
        if self.counterparty.timeout_seconds == 0 {
            bail!("counterparty.timeout_seconds must be greater than zero");
        }
        if self.counterparty.timeout_seconds > self.server.timeout_seconds {
            bail!(
                "counterparty.timeout_seconds ({}) exceeds server.timeout_seconds ({})",
                self.counterparty.timeout_seconds,
                self.server.timeout_seconds
            );
        }
        for (name, url) in self.counterparty.urls() {
            let parsed = Url::parse(url)
                .map_err(|e| anyhow::anyhow!("counterparty.{name} is not a valid URL: {e}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!("counterparty.{name} must use http or https");
            }
        }
        if self.cors.allow_credentials && self.cors.allowed_origins.iter().any(|o| o == "*") {
            bail!("cors.allow_credentials cannot be combined with a wildcard origin");
        }
        Ok(())
    }

    /// Get server address
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
