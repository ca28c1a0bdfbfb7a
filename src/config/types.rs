//! Configuration type definitions

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub store: StoreConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Location of the flat JSON store document.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub file: String,
}

/// Static site root and index document.
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub root: String,
    pub index: String,
}

/// SMTP relay settings. `user` and `password` are deployment secrets; lead
/// notification refuses to run without them.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MailConfig {
    pub to: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub secure: Option<bool>,
}
