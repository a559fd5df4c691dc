use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "./shelf.yaml";

fn default_listen_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_template_path() -> PathBuf {
    PathBuf::from("./html/files_page.html")
}

fn default_max_header_bytes() -> usize {
    64 * 1024
}

fn default_io_timeout_secs() -> u64 {
    30
}

/// Per-connection bounds: maximum accepted header block size and the
/// timeout applied to each read/write call.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Limits {
    #[serde(default = "default_max_header_bytes")]
    pub max_header_bytes: usize,
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
}

impl Limits {
    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_bytes: default_max_header_bytes(),
            io_timeout_secs: default_io_timeout_secs(),
        }
    }
}

/// On-disk configuration shape. The root directory is optional here so a
/// config file may omit it and rely on `SHELF_ROOT`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub listen_addr: Option<String>,
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
    #[serde(default)]
    pub template_path: Option<PathBuf>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub limits: Option<Limits>,
}

impl FileConfig {
    pub fn from_yaml(src: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(src).context("parsing config")
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("SHELF_LISTEN") {
            self.listen_addr = Some(addr);
        }
        if let Ok(root) = std::env::var("SHELF_ROOT") {
            self.root_dir = Some(PathBuf::from(root));
        }
        if let Ok(templ) = std::env::var("SHELF_TEMPLATE") {
            self.template_path = Some(PathBuf::from(templ));
        }
        if let Ok(log) = std::env::var("SHELF_LOG") {
            self.log_file = Some(PathBuf::from(log));
        }
    }

    /// Fill defaults and require the root directory.
    pub fn build(self) -> anyhow::Result<Config> {
        let root_dir = self
            .root_dir
            .context("no root directory configured (root_dir / SHELF_ROOT)")?;

        Ok(Config {
            listen_addr: self.listen_addr.unwrap_or_else(default_listen_addr),
            root_dir,
            template_path: self.template_path.unwrap_or_else(default_template_path),
            log_file: self.log_file,
            limits: self.limits.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Directory served to clients.
    pub root_dir: PathBuf,
    /// HTML template used to render directory listings.
    pub template_path: PathBuf,
    /// Append log output to this file instead of stdout.
    pub log_file: Option<PathBuf>,
    pub limits: Limits,
}

impl Config {
    /// Load configuration from the YAML file named by `SHELF_CONFIG`
    /// (default `./shelf.yaml` when present), then apply env overrides.
    /// Fails when no root directory ends up configured.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("SHELF_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut raw = match std::fs::read_to_string(&path) {
            Ok(src) => FileConfig::from_yaml(&src)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => return Err(e).with_context(|| format!("reading config file {path}")),
        };

        raw.apply_env();
        raw.build()
    }
}
