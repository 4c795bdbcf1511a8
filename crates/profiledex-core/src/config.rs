use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CatalogError, Result};

const ENV_BACKEND: &str = "PROFILEDEX_BACKEND";
const ENV_DATA_DIR: &str = "PROFILEDEX_DATA_DIR";
const ENV_STATIC_FILE: &str = "PROFILEDEX_STATIC_FILE";
const ENV_REST_ENDPOINT: &str = "PROFILEDEX_REST_ENDPOINT";
const ENV_TIMEOUT_MS: &str = "PROFILEDEX_TIMEOUT_MS";
const ENV_CACHE_FALLBACK: &str = "PROFILEDEX_CACHE_FALLBACK";
const ENV_NOTION_API_KEY: &str = "NOTION_API_KEY";
const ENV_NOTION_DATABASE_ID: &str = "NOTION_DATABASE_ID";
const ENV_NOTION_API_BASE: &str = "NOTION_API_BASE";

pub const DEFAULT_DATA_DIR: &str = ".profiledex";
pub const DEFAULT_REST_ENDPOINT: &str = "http://localhost:3000";
pub const DEFAULT_REST_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_TIMEOUT_MS: u64 = 15_000;
pub const NOTION_VERSION: &str = "2022-06-28";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Static,
    Rest,
    Notion,
    Memory,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Static => "static",
            Self::Rest => "rest",
            Self::Notion => "notion",
            Self::Memory => "memory",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" | "storage" => Ok(Self::Local),
            "static" | "file" => Ok(Self::Static),
            "rest" | "proxy" => Ok(Self::Rest),
            "notion" => Ok(Self::Notion),
            "memory" => Ok(Self::Memory),
            other => Err(CatalogError::Config(format!(
                "invalid backend: {other} (expected local|static|rest|notion|memory)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_REST_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_REST_TIMEOUT_MS,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct NotionConfig {
    pub api_key: Option<String>,
    pub database_id: Option<String>,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl NotionConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.database_id.is_some()
    }
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            database_id: None,
            base_url: DEFAULT_NOTION_BASE_URL.to_string(),
            timeout_ms: DEFAULT_NOTION_TIMEOUT_MS,
        }
    }
}

impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("database_id", &self.database_id)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Runtime configuration: defaults, then an optional TOML file, then the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Explicit backend choice; see [`CatalogConfig::resolved_backend`].
    pub backend: Option<BackendKind>,
    pub data_dir: PathBuf,
    pub static_file: Option<PathBuf>,
    pub rest: RestConfig,
    pub notion: NotionConfig,
    pub cache_fallback: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            static_file: None,
            rest: RestConfig::default(),
            notion: NotionConfig::default(),
            cache_fallback: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    backend: Option<String>,
    data_dir: Option<PathBuf>,
    static_file: Option<PathBuf>,
    cache_fallback: Option<bool>,
    rest: Option<RestSection>,
    notion: Option<NotionSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RestSection {
    endpoint: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NotionSection {
    api_key: Option<String>,
    database_id: Option<String>,
    base_url: Option<String>,
    timeout_ms: Option<u64>,
}

impl CatalogConfig {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = file {
            let raw = fs::read_to_string(path).map_err(|err| {
                CatalogError::Config(format!("cannot read {}: {err}", path.display()))
            })?;
            config.apply_toml(&raw)?;
        }
        config.apply_env_with(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn apply_toml(&mut self, raw: &str) -> Result<()> {
        let file = toml::from_str::<ConfigFile>(raw)
            .map_err(|err| CatalogError::Config(format!("invalid config file: {err}")))?;
        if let Some(backend) = file.backend.as_deref() {
            self.backend = Some(BackendKind::parse(backend)?);
        }
        if let Some(data_dir) = file.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(static_file) = file.static_file {
            self.static_file = Some(static_file);
        }
        if let Some(cache_fallback) = file.cache_fallback {
            self.cache_fallback = cache_fallback;
        }
        if let Some(rest) = file.rest {
            if let Some(endpoint) = rest.endpoint {
                self.rest.endpoint = normalize_base_url(&endpoint);
            }
            if let Some(timeout_ms) = rest.timeout_ms {
                self.rest.timeout_ms = timeout_ms;
            }
        }
        if let Some(notion) = file.notion {
            if notion.api_key.is_some() {
                self.notion.api_key = notion.api_key;
            }
            if notion.database_id.is_some() {
                self.notion.database_id = notion.database_id;
            }
            if let Some(base_url) = notion.base_url {
                self.notion.base_url = normalize_base_url(&base_url);
            }
            if let Some(timeout_ms) = notion.timeout_ms {
                self.notion.timeout_ms = timeout_ms;
            }
        }
        Ok(())
    }

    /// Overlays environment values read through `lookup`. Blank values are
    /// treated as unset.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(backend) = read(ENV_BACKEND) {
            self.backend = Some(BackendKind::parse(&backend)?);
        }
        if let Some(data_dir) = read(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Some(static_file) = read(ENV_STATIC_FILE) {
            self.static_file = Some(PathBuf::from(static_file));
        }
        if let Some(endpoint) = read(ENV_REST_ENDPOINT) {
            self.rest.endpoint = normalize_base_url(&endpoint);
        }
        if let Some(raw) = read(ENV_TIMEOUT_MS) {
            self.rest.timeout_ms = raw.parse::<u64>().map_err(|_| {
                CatalogError::Config(format!("invalid {ENV_TIMEOUT_MS}: {raw}"))
            })?;
        }
        if let Some(raw) = read(ENV_CACHE_FALLBACK) {
            self.cache_fallback = parse_bool(&raw).ok_or_else(|| {
                CatalogError::Config(format!("invalid {ENV_CACHE_FALLBACK}: {raw}"))
            })?;
        }
        if let Some(api_key) = read(ENV_NOTION_API_KEY) {
            self.notion.api_key = Some(api_key);
        }
        if let Some(database_id) = read(ENV_NOTION_DATABASE_ID) {
            self.notion.database_id = Some(database_id);
        }
        if let Some(base_url) = read(ENV_NOTION_API_BASE) {
            self.notion.base_url = normalize_base_url(&base_url);
        }
        Ok(())
    }

    /// The explicit choice if any; otherwise Notion when credentials are
    /// present, else local storage.
    #[must_use]
    pub fn resolved_backend(&self) -> BackendKind {
        match self.backend {
            Some(kind) => kind,
            None if self.notion.is_configured() => BackendKind::Notion,
            None => BackendKind::Local,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
