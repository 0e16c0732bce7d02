//! Runtime configuration from environment variables, with defaults.

use crate::panel::DEFAULT_PAGE_SIZE;
use std::path::PathBuf;

/// Which record store backs the panel.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StoreBackend {
    /// JSON blob under a single key in a data directory.
    #[default]
    Local,
    /// Document collection with server timestamps.
    Document,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(StoreBackend::Local),
            "document" | "remote" => Some(StoreBackend::Document),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
    pub page_size: usize,
    /// Start an empty local store from the default tournaments.
    pub seed: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            backend: StoreBackend::Local,
            data_dir: PathBuf::from("data"),
            page_size: DEFAULT_PAGE_SIZE,
            seed: true,
        }
    }
}

impl AppConfig {
    /// HOST, PORT, ADMIN_STORE, ADMIN_DATA_DIR, ADMIN_PAGE_SIZE, ADMIN_SEED.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or unparsable values fall back to the default, with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| {
            let raw = lookup(key)?;
            Some(raw).filter(|v| !v.trim().is_empty())
        };

        let port = match parsed("PORT") {
            Some(p) => p.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT {:?}", p);
                defaults.port
            }),
            None => defaults.port,
        };
        let backend = match parsed("ADMIN_STORE") {
            Some(b) => StoreBackend::parse(&b).unwrap_or_else(|| {
                log::warn!("Unknown ADMIN_STORE {:?}, using local", b);
                defaults.backend
            }),
            None => defaults.backend,
        };
        let page_size = match parsed("ADMIN_PAGE_SIZE") {
            Some(n) => match n.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!("Ignoring invalid ADMIN_PAGE_SIZE {:?}", n);
                    defaults.page_size
                }
            },
            None => defaults.page_size,
        };
        let seed = match parsed("ADMIN_SEED") {
            Some(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"),
            None => defaults.seed,
        };

        Self {
            host: parsed("HOST").unwrap_or(defaults.host),
            port,
            backend,
            data_dir: parsed("ADMIN_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            page_size,
            seed,
        }
    }
}
