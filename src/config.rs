use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub site: SiteConfig,
    pub ui: UiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub name: String,
}

/// Timings for the toast and redirect behavior of rendered pages.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub toast_ms: u64,
    pub redirect_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// How often expired sessions are removed from memory.
    pub sweep_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("SEATBOT_SERVER__HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SEATBOT_SERVER__PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort)?,
            },
            api: ApiConfig {
                base_url: env::var("SEATBOT_API__BASE_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
                timeout_secs: parse_number("SEATBOT_API__TIMEOUT_SECS", 10)?,
            },
            site: SiteConfig {
                name: env::var("SEATBOT_SITE__NAME").unwrap_or_else(|_| "SkyDesk".to_string()),
            },
            ui: UiConfig {
                toast_ms: parse_number("SEATBOT_UI__TOAST_MS", 3500)?,
                redirect_delay_ms: parse_number("SEATBOT_UI__REDIRECT_DELAY_MS", 500)?,
            },
            session: SessionConfig {
                sweep_secs: parse_number("SEATBOT_SESSION__SWEEP_SECS", 60)?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        // tokio's interval panics on a zero period.
        Duration::from_secs(self.session.sweep_secs.max(1))
    }
}

fn parse_number(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(key)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("{0} must be a non-negative integer")]
    InvalidNumber(&'static str),
}

#[cfg(test)]
impl Config {
    /// Configuration pointing the backend client at `base_url`, everything else default.
    pub fn for_tests(base_url: &str) -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            api: ApiConfig {
                base_url: base_url.to_string(),
                timeout_secs: 5,
            },
            site: SiteConfig {
                name: "SkyDesk".to_string(),
            },
            ui: UiConfig {
                toast_ms: 3500,
                redirect_delay_ms: 500,
            },
            session: SessionConfig { sweep_secs: 60 },
        }
    }
}
