// Configuration module entry point
// One Config struct populated at startup, shared through AppState.

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, MailConfig, PerformanceConfig, ServerConfig, SiteConfig,
    StoreConfig,
};

impl Config {
    /// Load configuration from an optional `config.toml`, overridden by
    /// `ESERVICE_`-prefixed environment variables (`__` separates sections).
    ///
    /// A local `.env` file of `KEY=VALUE` lines is read first; variables already
    /// present in the environment are not overridden.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("ESERVICE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("http.server_name", "EService/0.1")?
            .set_default("http.max_body_size", 1_000_000)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("store.file", "db.json")?
            .set_default("site.root", "site")?
            .set_default("site.index", "index.html")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
