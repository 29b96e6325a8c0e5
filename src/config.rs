use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::defs::{
    API_BASE_ENV, DEFAULT_API_HOST, DEFAULT_API_PORT, DEFAULT_LOG_FILE, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_SESSION_FILE, DEFAULT_TIMEOUT_SECS,
};
use crate::logging::{log_info, log_warning};

pub const CLIENT_CONFIG_PATH: &str = "conf/client.conf";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Full base URL; takes precedence over host/port when set.
    pub api_base: Option<String>,
    pub timeout: u64,
    pub poll_interval_ms: u64,
    pub session_file: String,
    pub log_file: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_API_HOST.to_string(),
            port: DEFAULT_API_PORT,
            api_base: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            session_file: DEFAULT_SESSION_FILE.to_string(),
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config_map = parse_config(&content)?;
        Ok(Self::from_map(&config_map))
    }

    fn from_map(config_map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();

        let host = config_map.get("host").cloned().unwrap_or(defaults.host);

        let port = config_map.get("port")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let api_base = config_map.get("api_base")
            .filter(|v| !v.is_empty())
            .cloned();

        let timeout = config_map.get("timeout")
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(defaults.timeout);

        let poll_interval_ms = config_map.get("poll_interval_ms")
            .and_then(|t| t.parse::<u64>().ok())
            .filter(|&ms| ms > 0)
            .unwrap_or(defaults.poll_interval_ms);

        let session_file = config_map.get("session_file").cloned().unwrap_or(defaults.session_file);
        let log_file = config_map.get("log_file").cloned().unwrap_or(defaults.log_file);

        ClientConfig { host, port, api_base, timeout, poll_interval_ms, session_file, log_file }
    }

    pub fn load_or_default() -> Self {
        let mut config = match Self::from_file(CLIENT_CONFIG_PATH) {
            Ok(config) => {
                log_info(&format!("Loaded client configuration from {CLIENT_CONFIG_PATH}"));
                config
            }
            Err(e) => {
                log_warning(&format!("Could not load client config from {CLIENT_CONFIG_PATH}: {e}. Using defaults."));
                Self::default()
            }
        };
        config.apply_env_override(std::env::var(API_BASE_ENV).ok());
        config
    }

    /// Base URL from the environment wins over the config file.
    pub fn apply_env_override(&mut self, api_base: Option<String>) {
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            self.api_base = Some(base.trim().to_string());
        }
    }

    pub fn server_url(&self) -> String {
        match &self.api_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_config(content: &str) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse key = value pairs
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            config.insert(key, value);
        }
    }

    Ok(config)
}
