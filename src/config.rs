// src/config.rs

// dependencies
use crate::alias::resolve_relative;
use crate::cors::{CorsPolicy, parse_methods};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const PUBLIC_DIR: &str = "./frontend/src/main/static/public";
pub const STYLESHEETS_ALIAS: &str = "stylesheets";
pub const STYLESHEETS_DIR: &str = "./frontend/src/main/static/stylesheets";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

// the directory the built-in configuration lives in; aliases resolve against it,
// never against the working directory of the process
pub fn config_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

// struct type which represents configuration for a single static mount
#[derive(Clone, Debug, Deserialize)]
pub struct StaticServerConfig {
    pub mount_path: Cow<'static, str>,
    pub root_dir: PathBuf,
    pub serve_index: bool,
}

// struct type which represents the listening side of the dev server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsPolicy,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        DevServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors: CorsPolicy::default(),
        }
    }
}

/// Everything the dev server needs, produced once at startup and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub mode: String,
    pub public_dir: PathBuf,
    pub aliases: BTreeMap<String, PathBuf>,
    pub server: DevServerConfig,
}

/// Builds the dev server configuration for `mode`.
///
/// Any mode string is accepted. The public directory is the same for every
/// mode; `mode` is only recorded on the result.
pub fn load_config(mode: &str) -> ServerConfig {
    let aliases = BTreeMap::from([(
        STYLESHEETS_ALIAS.to_string(),
        resolve_relative(config_dir(), Path::new(STYLESHEETS_DIR)),
    )]);

    ServerConfig {
        mode: mode.to_string(),
        public_dir: PathBuf::from(PUBLIC_DIR),
        aliases,
        server: DevServerConfig::default(),
    }
}

// overrides read from a TOML file; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    public_dir: Option<PathBuf>,
    aliases: Option<BTreeMap<String, PathBuf>>,
    server: Option<ServerSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    cors: Option<CorsSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CorsSection {
    origin: Option<String>,
    methods: Option<String>,
    preflight_continue: Option<bool>,
    options_success_status: Option<u16>,
}

// methods for the ServerConfig type
impl ServerConfig {
    /// Reads overrides from the TOML file at `path` on top of [`load_config`].
    ///
    /// Relative alias targets in the file resolve against the file's own directory.
    pub fn from_toml_file(path: impl AsRef<Path>, mode: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let base = if base.is_absolute() {
            base
        } else {
            // a bare file name has an empty parent; anchor it at the working directory
            std::env::current_dir()
                .map(|cwd| resolve_relative(&cwd, &base))
                .map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?
        };

        Self::from_toml_str(&text, &base, mode)
    }

    pub fn from_toml_str(text: &str, base: &Path, mode: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = load_config(mode);

        if let Some(public_dir) = file.public_dir {
            config.public_dir = public_dir;
        }

        for (name, target) in file.aliases.unwrap_or_default() {
            config.aliases.insert(name, resolve_relative(base, &target));
        }

        let server = file.server.unwrap_or_default();
        if let Some(host) = server.host {
            config.server.host = host;
        }
        if let Some(port) = server.port {
            config.server.port = port;
        }

        let cors = server.cors.unwrap_or_default();
        let policy = &mut config.server.cors;
        if let Some(origin) = cors.origin {
            policy.origin = origin;
        }
        if let Some(methods) = cors.methods {
            policy.methods = parse_methods(&methods).map_err(ConfigError::InvalidMethod)?;
        }
        if let Some(preflight_continue) = cors.preflight_continue {
            policy.preflight_continue = preflight_continue;
        }
        if let Some(status) = cors.options_success_status {
            policy.options_success_status = status;
        }

        Ok(config)
    }

    // static mounts in lookup order: aliases by descending mount length, then the public dir at "/"
    pub fn mounts(&self) -> Vec<StaticServerConfig> {
        let mut mounts: Vec<StaticServerConfig> = self
            .aliases
            .iter()
            .map(|(name, target)| StaticServerConfig {
                mount_path: Cow::Owned(format!("/{}", name.trim_matches('/'))),
                root_dir: target.clone(),
                serve_index: false,
            })
            .collect();
        mounts.sort_by(|a, b| b.mount_path.len().cmp(&a.mount_path.len()));

        mounts.push(StaticServerConfig {
            mount_path: Cow::Borrowed("/"),
            root_dir: self.public_dir.clone(),
            serve_index: true,
        });

        mounts
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
