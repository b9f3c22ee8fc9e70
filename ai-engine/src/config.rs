//! Configuration module

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/churn_model.json";

/// Local frontend and the Spring Boot backend
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:8080"];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Serialized model artifact loaded at startup
    pub model_path: PathBuf,

    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,

    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            log_json: false,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or(defaults.cors_origins),

            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.log_json),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }
}

/// Comma-separated origin list, blanks dropped
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_path, PathBuf::from("models/churn_model.json"));
        assert_eq!(config.cors_origins, vec!["http://localhost:3000", "http://localhost:8080"]);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://app.example.com, http://localhost:3000,,"),
            vec!["https://app.example.com", "http://localhost:3000"]
        );
        assert!(parse_origins("").is_empty());
    }
}
