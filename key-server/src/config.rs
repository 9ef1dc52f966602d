use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

const DEFAULT_PORT: u16 = 8189;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub dangerously_allow_non_loopback: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            dangerously_allow_non_loopback: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_listen_addr() -> String {
    format!("127.0.0.1:{DEFAULT_PORT}")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Loads the config at `path`, or defaults when no path is given or the file
/// does not exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("unable to parse config file {}", path.display()))
}

/// Parses `server.listen_addr` and keeps it on loopback unless
/// `dangerously_allow_non_loopback` is set.
pub fn resolve_listen_addr(cfg: &Config) -> Result<SocketAddr> {
    let addr = parse_listen_addr(&cfg.server.listen_addr)?;
    Ok(clamp_to_loopback(addr, cfg.server.dangerously_allow_non_loopback))
}

fn parse_listen_addr(raw: &str) -> Result<SocketAddr> {
    let raw = raw.trim();
    if let Some(port) = raw.strip_prefix("localhost:") {
        let port = port
            .parse::<u16>()
            .with_context(|| format!("invalid port in listen_addr {raw:?}"))?;
        return Ok(SocketAddr::from(([127, 0, 0, 1], port)));
    }
    raw.parse::<SocketAddr>()
        .with_context(|| format!("listen_addr {raw:?} is not an ip:port socket address"))
}

fn clamp_to_loopback(addr: SocketAddr, allow_non_loopback: bool) -> SocketAddr {
    if addr.ip().is_loopback() {
        return addr;
    }

    if allow_non_loopback {
        warn!("DANGEROUS: key server listening on non-loopback address {addr}");
        return addr;
    }

    warn!(
        "key server requested non-loopback bind ({addr}); clamping to 127.0.0.1:{port} (set dangerously_allow_non_loopback to override)",
        port = addr.port()
    );
    SocketAddr::from(([127, 0, 0, 1], addr.port()))
}
