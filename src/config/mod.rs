//! murmur configuration.
//!
//! One [`Config`] value is read at startup and handed, section by section,
//! to the stores, services and HTTP server. Nothing reads configuration
//! lazily after that.

mod limits;
mod server;
mod storage;

pub use limits::{
    PaginationConfig, RequestConfig, DEFAULT_COMMENTS_MAX_PAGE_SIZE, DEFAULT_FEED_MAX_PAGE_SIZE,
    DEFAULT_REQUEST_TIMEOUT_MS,
};
pub use server::ServerConfig;
pub use storage::{PostgresConfig, SqliteConfig, StorageConfig, StorageType};

/// Optional file read from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Names a required config file layered over the default one.
pub const CONFIG_ENV_VAR: &str = "MURMUR_CONFIG";
/// `MURMUR__SERVER__PORT=9000` overrides `server.port`.
pub const CONFIG_ENV_PREFIX: &str = "MURMUR";
/// Tracing filter directive, e.g. `murmur=debug,tower_http=info`.
pub const LOG_ENV_VAR: &str = "MURMUR_LOG";

use serde::Deserialize;

/// Every configurable section. Missing keys take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Backend selection and pool size.
    pub storage: StorageConfig,
    /// Maximum page sizes.
    pub pagination: PaginationConfig,
    /// Per-request deadline.
    pub request: RequestConfig,
}

impl Config {
    /// Read configuration, later sources overriding earlier ones:
    /// `config.yaml` if present, then `path`, then the file named by
    /// `MURMUR_CONFIG`, then `MURMUR__*` variables.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        use ::config::{Environment, File, FileFormat};

        let explicit = path
            .map(str::to_string)
            .into_iter()
            .chain(std::env::var(CONFIG_ENV_VAR).ok());

        let mut sources = ::config::Config::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));
        for file in explicit {
            sources = sources.add_source(File::new(&file, FileFormat::Yaml).required(true));
        }

        let layered = sources
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(layered.try_deserialize()?)
    }

    /// Defaults only, no file or environment lookup.
    pub fn for_test() -> Self {
        Self::default()
    }
}
