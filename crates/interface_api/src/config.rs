//! API configuration

use serde::Deserialize;

/// Runtime settings, read from `API_`-prefixed environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Secret for signing session tokens
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub jwt_expiration_secs: u64,
    /// PostgreSQL connection string
    pub database_url: String,
    /// Directory for stored claim documents
    pub document_dir: String,
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/funeral_cover".to_string(),
            document_dir: "uploads".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// The address the server binds to
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
