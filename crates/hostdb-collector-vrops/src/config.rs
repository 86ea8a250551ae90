//! Configuration loading and types

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{WrapErr, bail, ensure};
use serde::{Deserialize, Serialize};
use vrops_client::TransportOptions;
use vrops_inventory::{CollectorSettings, SinkFailurePolicy};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "HOSTDB_COLLECTOR_VROPS_CONFIG";

/// Prefix of per-key environment overrides, e.g. `HOSTDB_COLLECTOR_VROPS_VROPS_PASS`
pub const ENV_PREFIX: &str = "HOSTDB_COLLECTOR_VROPS_";

/// A password; never printed by `Debug`
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"***\"")
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Collector behaviour
    #[serde(default)]
    pub collector: CollectorConfig,
    /// vROps connection and collection scope
    pub vrops: VropsConfig,
    /// HostDB destination, unused in sample-data mode
    #[serde(default)]
    pub hostdb: HostDbConfig,
}

/// Collector behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Log at debug level
    #[serde(default)]
    pub debug: bool,
    /// Write record sets to `sample_data_dir` instead of HostDB
    #[serde(default)]
    pub sample_data: bool,
    #[serde(default = "default_sample_data_dir")]
    pub sample_data_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// `text` or `json`
    #[serde(default)]
    pub log_format: LogFormat,
    /// `abort` or `skip`
    #[serde(default)]
    pub on_sink_error: SinkFailurePolicy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            debug: false,
            sample_data: false,
            sample_data_dir: default_sample_data_dir(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            on_sink_error: SinkFailurePolicy::default(),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_sample_data_dir() -> PathBuf {
    PathBuf::from("/sample-data")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// vROps connection and collection scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VropsConfig {
    /// Base URL, e.g. `https://vrops.example.com`
    pub host: String,
    pub user: String,
    /// Appended as `user@user_domain` when `user` has no domain of its own
    #[serde(default)]
    pub user_domain: String,
    #[serde(default)]
    pub pass: Secret,
    /// Resources requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Adapter kind to collect
    #[serde(default = "default_adapter_kind")]
    pub adapter_kind: String,
    /// Resource kinds turned into records
    #[serde(default)]
    pub resource_kind_keys: Vec<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl VropsConfig {
    /// Login name sent with the token request
    #[must_use]
    pub fn login(&self) -> String {
        if self.user_domain.is_empty() || self.user.contains('@') {
            self.user.clone()
        } else {
            format!("{}@{}", self.user, self.user_domain)
        }
    }
}

fn default_page_size() -> u64 {
    1000
}

fn default_adapter_kind() -> String {
    "VMWARE".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// HostDB destination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostDbConfig {
    /// Base URL, e.g. `https://hostdb.example.com`
    #[serde(default)]
    pub url: String,
    /// Basic auth user; no auth when empty
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: Secret,
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).wrap_err_with(|| format!("failed to parse {}", path.display()))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not a valid configuration
    pub fn parse(content: &str) -> eyre::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override values from `HOSTDB_COLLECTOR_VROPS_<SECTION>_<KEY>` variables
    ///
    /// `lookup` resolves a variable name, normally `std::env::var(..).ok()`.
    ///
    /// # Errors
    /// Returns error if a numeric or boolean override does not parse
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<()> {
        let var = |key: &str| lookup(&format!("{ENV_PREFIX}{key}"));

        if let Some(v) = var("VROPS_HOST") {
            self.vrops.host = v;
        }
        if let Some(v) = var("VROPS_USER") {
            self.vrops.user = v;
        }
        if let Some(v) = var("VROPS_USER_DOMAIN") {
            self.vrops.user_domain = v;
        }
        if let Some(v) = var("VROPS_PASS") {
            self.vrops.pass = Secret::new(v);
        }
        if let Some(v) = var("VROPS_PAGE_SIZE") {
            self.vrops.page_size = v
                .parse()
                .wrap_err_with(|| format!("invalid {ENV_PREFIX}VROPS_PAGE_SIZE: {v}"))?;
        }
        if let Some(v) = var("HOSTDB_URL") {
            self.hostdb.url = v;
        }
        if let Some(v) = var("HOSTDB_USER") {
            self.hostdb.user = v;
        }
        if let Some(v) = var("HOSTDB_PASS") {
            self.hostdb.pass = Secret::new(v);
        }
        if let Some(v) = var("COLLECTOR_DEBUG") {
            self.collector.debug = parse_bool("COLLECTOR_DEBUG", &v)?;
        }
        if let Some(v) = var("COLLECTOR_SAMPLE_DATA") {
            self.collector.sample_data = parse_bool("COLLECTOR_SAMPLE_DATA", &v)?;
        }

        Ok(())
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// Returns error describing the first problem found
    pub fn validate(&self) -> eyre::Result<()> {
        ensure!(!self.vrops.host.is_empty(), "vrops.host is required");
        ensure!(!self.vrops.user.is_empty(), "vrops.user is required");
        ensure!(self.vrops.page_size > 0, "vrops.page_size must be at least 1");
        ensure!(
            !self.vrops.resource_kind_keys.is_empty(),
            "vrops.resource_kind_keys must list at least one resource kind"
        );
        ensure!(
            self.collector.sample_data || !self.hostdb.url.is_empty(),
            "hostdb.url is required unless collector.sample_data is set"
        );
        Ok(())
    }

    /// Settings for the collection run
    #[must_use]
    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            adapter_kind: self.vrops.adapter_kind.clone(),
            resource_kinds: self.vrops.resource_kind_keys.clone(),
            page_size: self.vrops.page_size,
            on_sink_error: self.collector.on_sink_error,
        }
    }

    /// Transport options shared by the vROps and HostDB clients
    #[must_use]
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: Duration::from_secs(self.vrops.timeout_secs),
            accept_invalid_certs: self.vrops.accept_invalid_certs,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> eyre::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => bail!("invalid {ENV_PREFIX}{key}: {value}"),
    }
}

/// Find the config file to load
///
/// An explicit path wins, then [`CONFIG_ENV`], then `config.toml` in the
/// working directory, `/etc/hostdb-collector-vrops/` and the user config dir.
///
/// # Errors
/// Returns error if no candidate exists
pub fn locate(explicit: Option<&Path>) -> eyre::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let mut paths = vec![
        PathBuf::from("config.toml"),
        PathBuf::from("/etc/hostdb-collector-vrops/config.toml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("hostdb-collector-vrops/config.toml"));
    }

    paths
        .into_iter()
        .find(|path| path.exists())
        .ok_or_else(|| eyre::eyre!("no config file found; pass --config or set {CONFIG_ENV}"))
}
