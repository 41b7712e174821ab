use std::time::Duration;

const URL_ENV: &str = "TASKBOARD_URL";
const POLL_SECS_ENV: &str = "TASKBOARD_POLL_SECS";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Reads overrides from the environment; unset or unusable values keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(URL_ENV).map(|raw| raw.trim().to_string())
            && !url.is_empty()
        {
            config.base_url = url;
        }

        if let Some(raw) = lookup(POLL_SECS_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.poll_interval = Duration::from_secs(secs),
                _ => tracing::warn!("Invalid {POLL_SECS_ENV} value {raw:?}; using default"),
            }
        }

        config
    }
}
