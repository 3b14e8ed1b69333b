use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use ctl_logging::ctl_info;
use serde::{Deserialize, Serialize};
use syncctl_engine::ControllerSettings;

pub const CONFIG_FILENAME: &str = "syncctl.ron";
pub const BASE_URL_ENV: &str = "SYNCCTL_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let settings = ControllerSettings::default();
        Self {
            base_url: settings.base_url,
            poll_interval_ms: millis(settings.poll_interval),
            connect_timeout_ms: millis(settings.connect_timeout),
            request_timeout_ms: millis(settings.request_timeout),
            page_size: settings.page_size,
        }
    }
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogDestination {
    File,
    /// Writes to stderr alongside the console output; mostly useful while debugging.
    Terminal,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub destination: LogDestination,
    pub level: LogLevel,
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: LogLevel::Info,
            file: PathBuf::from("./syncctl.log"),
        }
    }
}

impl AppConfig {
    /// Reads `explicit`, or `./syncctl.ron` when none was given. Only the
    /// implicit file may be absent.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit.unwrap_or_else(|| Path::new(CONFIG_FILENAME));
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("cannot read config {}", path.display()))
            }
        };
        let config: Self = ron::from_str(&content)
            .with_context(|| format!("malformed config {}", path.display()))?;
        ctl_info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies `SYNCCTL_BASE_URL` if it is set and not blank.
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|url| !url.trim().is_empty()) {
            self.server.base_url = url.trim().to_string();
        }
        self
    }

    pub fn controller_settings(&self) -> anyhow::Result<ControllerSettings> {
        let server = &self.server;
        if server.poll_interval_ms == 0 {
            bail!("server.poll_interval_ms must be positive");
        }
        if server.request_timeout_ms == 0 || server.connect_timeout_ms == 0 {
            bail!("server timeouts must be positive");
        }
        if server.page_size == 0 {
            bail!("server.page_size must be at least 1");
        }
        Ok(ControllerSettings {
            base_url: server.base_url.clone(),
            poll_interval: Duration::from_millis(server.poll_interval_ms),
            connect_timeout: Duration::from_millis(server.connect_timeout_ms),
            request_timeout: Duration::from_millis(server.request_timeout_ms),
            page_size: server.page_size,
        })
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
