use std::path::PathBuf;

use directories::ProjectDirs;
use strip_ansi_escapes::strip;
use thiserror::Error;

const ASSET_DIR_ENV: &str = "TASKBOARD_ASSET_DIR";
const SEED_ENV: &str = "TASKBOARD_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid HOST value: {0:?}")]
    InvalidHost(String),
    #[error("Invalid port value: {0:?}")]
    InvalidPort(String),
}

/// Startup settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    /// 0 lets the OS pick a free port.
    pub port: u16,
    pub database_url: String,
    pub asset_dir: PathBuf,
    pub seed: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = match lookup("HOST") {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::InvalidHost(raw)),
            Some(raw) => raw.trim().to_string(),
            None => "127.0.0.1".to_string(),
        };

        let port = match lookup("BACKEND_PORT").or_else(|| lookup("PORT")) {
            Some(raw) => parse_port(&raw)?,
            None => {
                tracing::info!("No PORT environment variable set, using port 0 for auto-assignment");
                0
            }
        };

        let asset_dir = non_blank(lookup(ASSET_DIR_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(default_asset_dir);
        let database_url = non_blank(lookup("DATABASE_URL")).unwrap_or_else(|| {
            format!(
                "sqlite://{}?mode=rwc",
                asset_dir.join("db.sqlite").to_string_lossy()
            )
        });

        let seed = lookup(SEED_ENV)
            .map(|raw| matches!(raw.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            database_url,
            asset_dir,
            seed,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Ports sometimes arrive wrapped in terminal colour codes from dev tooling.
fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let cleaned = String::from_utf8_lossy(&strip(raw.as_bytes())).into_owned();
    cleaned
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn default_asset_dir() -> PathBuf {
    ProjectDirs::from("dev", "taskboard", "taskboard")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".taskboard"))
}
