use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
}

/// HTTP surface and local persistence
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            store_path: default_store_path(),
        }
    }
}

/// Remote coordinator endpoint and credentials.
///
/// Deliberately not validated for presence: with an empty base URL the
/// batch fetch simply fails remotely and the cycle is treated as empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub base_url: String,
    /// Shared secret sent with every coordinator call; loaded from the
    /// environment, never from config files
    #[serde(skip)]
    pub api_key: String,
}

/// Collection cycle timing and image storage
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectorConfig {
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
    #[serde(default = "default_download_reserve_secs")]
    pub download_reserve_secs: u64,
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl CollectorConfig {
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    pub fn download_reserve(&self) -> Duration {
        Duration::from_secs(self.download_reserve_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: default_cycle_interval_secs(),
            download_reserve_secs: default_download_reserve_secs(),
            image_dir: default_image_dir(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:3000".parse().unwrap()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/records")
}

fn default_cycle_interval_secs() -> u64 {
    180
}

fn default_download_reserve_secs() -> u64 {
    60
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("data/images")
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}
