use std::time::Duration;

use syncctl_core::DEFAULT_PAGE_SIZE;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub base_url: String,
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub page_size: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_millis(5000),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
