use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use status_client::PollerConfig;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "countdown.toml";

/// Runtime tuning. User-facing preferences live in the settings document;
/// this covers cadence, paths and the poller's retry policy.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub app_dir: PathBuf,
    pub tick_interval: Duration,
    pub poller: PollerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_dir: storage::resolve_app_dir(),
            tick_interval: Duration::from_millis(200),
            poller: PollerConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    app_dir: Option<PathBuf>,
    tick_interval_ms: Option<u64>,
    poll_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    backoff_base_secs: Option<u64>,
    backoff_max_secs: Option<u64>,
    jitter_fraction: Option<f64>,
    fallback_threshold: Option<u32>,
    cache_bust: Option<bool>,
}

pub fn load_config(path: &Path) -> AppConfig {
    let mut config = AppConfig::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileConfig>(&raw) {
            Ok(file_cfg) => config.apply_file(file_cfg),
            Err(err) => warn!(path = %path.display(), %err, "ignoring malformed config file"),
        }
    }

    config.apply_env(|key| std::env::var(key).ok());
    config
}

impl AppConfig {
    fn apply_file(&mut self, file_cfg: FileConfig) {
        if let Some(v) = file_cfg.app_dir {
            self.app_dir = v;
        }
        if let Some(v) = file_cfg.tick_interval_ms {
            self.tick_interval = Duration::from_millis(v.max(10));
        }
        if let Some(v) = file_cfg.poll_interval_secs {
            self.poller.poll_interval = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.poller.request_timeout = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.backoff_base_secs {
            self.poller.backoff.base = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.backoff_max_secs {
            self.poller.backoff.max = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.jitter_fraction {
            self.poller.backoff.jitter_fraction = v;
        }
        if let Some(v) = file_cfg.fallback_threshold {
            self.poller.fallback_threshold = v;
        }
        if let Some(v) = file_cfg.cache_bust {
            self.poller.cache_bust = v;
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("APP__APP_DIR") {
            self.app_dir = PathBuf::from(v);
        }
        if let Some(v) = parsed::<u64>(&lookup, "APP__TICK_INTERVAL_MS") {
            self.tick_interval = Duration::from_millis(v.max(10));
        }
        if let Some(v) = parsed::<u64>(&lookup, "APP__POLL_INTERVAL_SECS") {
            self.poller.poll_interval = Duration::from_secs(v);
        }
        if let Some(v) = parsed::<u64>(&lookup, "APP__REQUEST_TIMEOUT_SECS") {
            self.poller.request_timeout = Duration::from_secs(v);
        }
        if let Some(v) = parsed::<u64>(&lookup, "APP__BACKOFF_BASE_SECS") {
            self.poller.backoff.base = Duration::from_secs(v);
        }
        if let Some(v) = parsed::<u64>(&lookup, "APP__BACKOFF_MAX_SECS") {
            self.poller.backoff.max = Duration::from_secs(v);
        }
        if let Some(v) = parsed::<f64>(&lookup, "APP__JITTER_FRACTION") {
            self.poller.backoff.jitter_fraction = v;
        }
        if let Some(v) = parsed::<u32>(&lookup, "APP__FALLBACK_THRESHOLD") {
            self.poller.fallback_threshold = v;
        }
        if let Some(v) = parsed::<bool>(&lookup, "APP__CACHE_BUST") {
            self.poller.cache_bust = v;
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
