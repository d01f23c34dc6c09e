pub mod http;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::MonitorRef;

pub struct MonitorManager {}

impl MonitorManager {
    /// Builds the monitor client from the loaded configuration.
    pub fn get() -> Result<MonitorRef> {
        let timeout = Duration::from_millis(Config::get_u64(ConfigKey::RequestTimeout)?);
        let monitor = http::HttpMonitor::new(&Config::get(ConfigKey::ServerURL), timeout)?;

        return Ok(Arc::new(monitor));
    }
}
