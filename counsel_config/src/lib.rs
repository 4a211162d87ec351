use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use counsel_models::contact::EmailAddress;
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");
pub const DEV_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.dev.toml");

/// Colon separated list of additional config files.
pub const CONFIG_PATHS_VAR: &str = "COUNSEL_CONFIG";
/// Prefix of environment variables overriding single keys, e.g.
/// `COUNSEL__CRM__API_TOKEN`.
pub const ENV_PREFIX: &str = "COUNSEL";

/// Load the default config, the files listed in `COUNSEL_CONFIG` and the
/// environment overrides, in this order.
pub fn load() -> anyhow::Result<Config> {
    let extra_paths = std::env::var(CONFIG_PATHS_VAR).unwrap_or_default();
    let paths = std::iter::once(DEFAULT_CONFIG_PATH)
        .chain(extra_paths.split(':').filter(|path| !path.is_empty()))
        .collect::<Vec<_>>();

    load_paths(&paths)
}

/// Load the default config with the development overrides, as used by tests
/// and `counsel-testing`.
pub fn load_dev_config() -> anyhow::Result<Config> {
    load_paths(&[DEFAULT_CONFIG_PATH, DEV_CONFIG_PATH])
}

pub fn load_paths(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub crm: CrmConfig,
    pub contact: ContactConfig,
    pub cms: CmsConfig,
    pub news: NewsConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed to call the api from a browser. Empty allows any.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CrmConfig {
    pub endpoint: Url,
    pub api_token: String,
    pub api_version: String,
    pub board_id: String,
    pub timeout: Duration,
    pub columns: CrmColumnsConfig,
}

/// Column ids of the CRM board.
#[derive(Debug, Deserialize)]
pub struct CrmColumnsConfig {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub legal_service: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub intake_email: EmailAddress,
    pub firm_name: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

#[derive(Debug, Deserialize)]
pub struct CmsConfig {
    /// Base url of the content api, ending with a slash.
    pub endpoint: Url,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct NewsConfig {
    pub page_size: u32,
    pub max_retries: u32,
    pub retry_delay: Duration,
}
