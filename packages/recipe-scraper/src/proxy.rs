//! Round-robin proxy pool.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ConfigError;
use crate::traits::proxy::ProxySource;

#[derive(Debug, Default)]
struct PoolState {
    proxies: Vec<String>,
    failed: HashSet<String>,
    cursor: usize,
}

impl PoolState {
    fn available(&self) -> Vec<&String> {
        self.proxies
            .iter()
            .filter(|p| !self.failed.contains(*p))
            .collect()
    }
}

/// Proxy list rotated round-robin over the proxies that have not failed.
///
/// When every proxy has failed, the failure set is cleared and rotation
/// starts over with the full list.
#[derive(Debug)]
pub struct ProxyPool {
    enabled: bool,
    state: Mutex<PoolState>,
}

impl ProxyPool {
    /// Create an empty pool.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: Mutex::new(PoolState::default()),
        }
    }

    /// Build a pool from configuration, reading the proxy list when
    /// proxying is enabled. A missing list file yields an empty pool.
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ConfigError> {
        let pool = Self::new(config.proxy_enabled);
        if !config.proxy_enabled {
            return Ok(pool);
        }

        match pool.load_from_file(&config.proxy_list_file) {
            Ok(count) => info!(count, path = %config.proxy_list_file, "Loaded proxies"),
            Err(ConfigError::ProxyFile { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                warn!(path = %config.proxy_list_file, "Proxy list not found, connecting directly");
            }
            Err(e) => return Err(e),
        }
        Ok(pool)
    }

    /// Add proxies from a file, one per line. Blank lines and `#` comments
    /// are skipped. Returns the number of lines read as proxies.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<usize, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ProxyFile {
            path: path.display().to_string(),
            source,
        })?;

        let mut count = 0;
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.add(line);
            count += 1;
        }
        Ok(count)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Add a proxy. Adding one already present is a no-op.
    pub fn add(&self, proxy: impl Into<String>) {
        let proxy = proxy.into();
        let mut state = self.lock();
        if !state.proxies.contains(&proxy) {
            state.proxies.push(proxy);
        }
    }

    pub fn remove(&self, proxy: &str) {
        let mut state = self.lock();
        state.proxies.retain(|p| p != proxy);
        state.failed.remove(proxy);
    }

    /// Put every failed proxy back into rotation.
    pub fn reset_failures(&self) {
        self.lock().failed.clear();
    }

    /// Number of proxies in the pool.
    pub fn len(&self) -> usize {
        self.lock().proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of proxies not marked failed.
    pub fn available(&self) -> usize {
        self.lock().available().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProxySource for ProxyPool {
    fn next_proxy(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let mut state = self.lock();
        if state.proxies.is_empty() {
            return None;
        }

        if state.available().is_empty() {
            debug!("All proxies failed, resetting rotation");
            state.failed.clear();
        }

        let available: Vec<String> = state.available().into_iter().cloned().collect();
        let index = state.cursor % available.len();
        state.cursor = index + 1;
        Some(available[index].clone())
    }

    fn mark_failed(&self, proxy: &str) {
        warn!(proxy = %proxy, "Marking proxy as failed");
        self.lock().failed.insert(proxy.to_string());
    }
}
