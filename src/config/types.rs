use reelshelf_common::paths::{default_playable_extensions, ExtensionFilter};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub library: LibraryConfig,
}

impl Config {
    /// Extension filter built from `library.extensions`.
    pub fn extension_filter(&self) -> ExtensionFilter {
        ExtensionFilter::new(&self.library.extensions)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory with the browser UI (index.html and assets)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Bytes read from disk per chunk while streaming
    #[serde(default = "default_stream_buffer_size")]
    pub stream_buffer_size: usize,

    /// Seconds allowed for reading a request head or body. Responses are
    /// never timed out.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    9898
}
fn default_stream_buffer_size() -> usize {
    32 * 1024
}
fn default_read_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            stream_buffer_size: default_stream_buffer_size(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Media root; the positional CLI argument takes precedence
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Extensions considered playable (case-insensitive, without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Leave files with other extensions out of the tree
    #[serde(default)]
    pub hide_unsupported: bool,
}

fn default_extensions() -> Vec<String> {
    default_playable_extensions()
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: None,
            extensions: default_extensions(),
            hide_unsupported: false,
        }
    }
}
