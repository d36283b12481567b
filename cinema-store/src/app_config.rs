use cinema_booking::ReleasePolicy;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueueConfig {
    /// Pending requests accepted before submissions are turned away.
    #[serde(default = "default_queue_capacity")]
    pub capacity: usize,
    /// Finished outcomes kept for lookup by request id.
    #[serde(default = "default_outcome_retention")]
    pub outcome_retention: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_queue_capacity(),
            outcome_retention: default_outcome_retention(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BusinessRules {
    #[serde(default)]
    pub release_policy: ReleasePolicy,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_queue_capacity() -> usize { 1024 }
fn default_outcome_retention() -> usize { 1024 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        tracing::debug!("Loading configuration for run mode {}", run_mode);

        let s = config::Config::builder()
            // Defaults are compiled in, so even the base file is optional
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `CINEMA__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("CINEMA").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
