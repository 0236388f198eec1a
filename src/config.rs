use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Root of the Huddle01 REST API (v2).
pub const HUDDLE01_API_V2: &str = "https://api.huddle01.com/api/v2";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub huddle01: Huddle01Config,
    /// Path the config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Mount point of the MCP endpoint on the HTTP router
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub transport: TransportKind,
    /// Runtime worker threads; tokio's default when unset
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            path: default_path(),
            transport: TransportKind::default(),
            workers: None,
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Streamable HTTP behind an axum router
    #[default]
    Http,
    /// MCP over stdin/stdout
    Stdio,
}

#[derive(Deserialize)]
pub struct Huddle01Config {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for Huddle01Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            base_url: default_base_url(),
        }
    }
}

impl std::fmt::Debug for Huddle01Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Huddle01Config")
            .field("api_key", &redact(&self.api_key))
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Startup failures. All of them are fatal.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingApiKey,
    MissingProjectId,
    InvalidValue { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(f, "HUDDLE01_API_KEY environment variable is required"),
            ConfigError::MissingProjectId => {
                write!(f, "HUDDLE01_PROJECT_ID environment variable is required")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated, immutable provider settings shared by every outbound call.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderContext {
    api_key: String,
    project_id: String,
    base_url: String,
}

impl ProviderContext {
    /// Both credentials must be present and non-blank.
    pub fn from_config(config: &Huddle01Config) -> Result<Self, ConfigError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let project_id = config.project_id.trim();
        if project_id.is_empty() {
            return Err(ConfigError::MissingProjectId);
        }
        Ok(Self {
            api_key: api_key.to_string(),
            project_id: project_id.to_string(),
            base_url: config.base_url.clone(),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderContext")
            .field("api_key", &redact(&self.api_key))
            .field("project_id", &self.project_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Overlay environment variables onto the file values.
    ///
    /// Names are matched case-insensitively, so `Huddle01_API_KEY` and
    /// `HUDDLE01_API_KEY` are equivalent.
    pub fn apply_env<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.to_ascii_uppercase().as_str() {
                "HUDDLE01_API_KEY" => self.huddle01.api_key = value,
                "HUDDLE01_PROJECT_ID" => self.huddle01.project_id = value,
                "HUDDLE01_BASE_URL" => self.huddle01.base_url = value,
                "HUDDLE01_MCP_HOST" => self.server.bind = value,
                "HUDDLE01_MCP_PORT" => self.server.port = parse_env(&key, &value)?,
                "HUDDLE01_MCP_PATH" => self.server.path = value,
                "HUDDLE01_MCP_WORKERS" => self.server.workers = Some(parse_env(&key, &value)?),
                "HUDDLE01_MCP_LOG_LEVEL" => self.server.log_level = value,
                "HUDDLE01_MCP_TRANSPORT" => {
                    self.server.transport = match value.to_ascii_lowercase().as_str() {
                        "http" => TransportKind::Http,
                        "stdio" => TransportKind::Stdio,
                        _ => return Err(ConfigError::InvalidValue { key, value }),
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// The MCP endpoint is mounted as a fixed sub-path of the router.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = &self.server.path;
        if !path.starts_with('/') || path == "/" || path.contains(['{', '*']) {
            return Err(ConfigError::InvalidValue {
                key: "server.path".to_string(),
                value: path.clone(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Non-UTF-8 variables are never ours; skip them instead of panicking.
fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_path() -> String {
    "/mcp".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    HUDDLE01_API_V2.to_string()
}

/// Default config path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/huddle01-mcp/huddle01-mcp.toml";
/// Fallback path for development
pub const DEV_CONFIG_PATH: &str = "huddle01-mcp.toml";
/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "HUDDLE01_MCP_CONFIG";

/// Load config from the first available path, then overlay the environment.
///
/// A missing file is fine: credentials usually arrive through the environment.
pub fn load_config() -> anyhow::Result<Config> {
    let explicit = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let path = match explicit {
        Some(path) => Some(path),
        None => [DEFAULT_CONFIG_PATH, DEV_CONFIG_PATH]
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists()),
    };

    let mut config = match path {
        Some(path) => Config::load_from_file(&path).map_err(|e| {
            anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e)
        })?,
        None => Config::default(),
    };
    config.apply_env(utf8_vars(std::env::vars_os()))?;
    config.validate()?;
    Ok(config)
}
