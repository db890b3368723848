use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::env::ReadEnv;
use crate::routing::{Route, RoutePattern, RouteTable, Routes};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_IRKER_ADDR: &str = "127.0.0.1:6659";
const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid route pattern \"{pattern}\": {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// On-disk layout of `github-relay.toml`.
///
/// ```toml
/// [server]
/// port = 8080
/// webhook_secret = "..."
///
/// [irker]
/// addr = "127.0.0.1:6659"
///
/// [irc]
/// "octo/*" = ["ircs://irc.libera.chat/#octo"]
///
/// [discord]
/// "octo/hello-world" = ["https://discord.com/api/webhooks/1/abc"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    server: ServerSection,
    irker: IrkerSection,
    irc: BTreeMap<String, Vec<String>>,
    discord: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    port: Option<u16>,
    webhook_secret: Option<String>,
    delivery_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct IrkerSection {
    addr: Option<String>,
}

/// Configuration for the relay server.
///
/// Resolved from the TOML file, then overridden by environment variables:
/// - `GITHUB_WEBHOOK_SECRET`: HMAC-SHA256 secret configured in GitHub (omit to skip validation)
/// - `GITHUB_WEBHOOK_PORT`: HTTP listening port (default: 8080)
/// - `IRKER_ADDR`: `host:port` of the irker daemon (default: `127.0.0.1:6659`)
///
/// Routes only come from the file.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub webhook_secret: Option<String>,
    pub port: u16,
    pub irker_addr: String,
    pub delivery_timeout: Duration,
    pub routes: Routes,
}

impl RelayConfig {
    /// Environment only: no routes, so every delivery is answered with
    /// "no route".
    pub fn from_env<E: ReadEnv>(env: &E) -> Self {
        Self::resolve(FileConfig::default(), Routes::default(), env)
    }

    pub fn from_toml_str<E: ReadEnv>(content: &str, env: &E) -> Result<Self, ConfigError> {
        let mut file: FileConfig = toml::from_str(content)?;
        let routes = Routes {
            irc: compile(std::mem::take(&mut file.irc))?,
            discord: compile(std::mem::take(&mut file.discord))?,
        };
        Ok(Self::resolve(file, routes, env))
    }

    pub fn from_file<E: ReadEnv>(path: &Path, env: &E) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, env)
    }

    fn resolve<E: ReadEnv>(file: FileConfig, routes: Routes, env: &E) -> Self {
        Self {
            webhook_secret: env
                .var("GITHUB_WEBHOOK_SECRET")
                .ok()
                .or(file.server.webhook_secret)
                .filter(|s| !s.is_empty()),
            port: env
                .var("GITHUB_WEBHOOK_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .or(file.server.port)
                .unwrap_or(DEFAULT_PORT),
            irker_addr: env
                .var("IRKER_ADDR")
                .ok()
                .or(file.irker.addr)
                .unwrap_or_else(|| DEFAULT_IRKER_ADDR.to_string()),
            delivery_timeout: Duration::from_secs(
                file.server
                    .delivery_timeout_secs
                    .unwrap_or(DEFAULT_DELIVERY_TIMEOUT_SECS),
            ),
            routes,
        }
    }
}

fn compile(entries: BTreeMap<String, Vec<String>>) -> Result<RouteTable, ConfigError> {
    let routes = entries
        .into_iter()
        .map(|(pattern, targets)| {
            let compiled = RoutePattern::new(&pattern)
                .map_err(|source| ConfigError::Pattern { pattern, source })?;
            Ok(Route {
                pattern: compiled,
                targets,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    Ok(RouteTable::new(routes))
}
