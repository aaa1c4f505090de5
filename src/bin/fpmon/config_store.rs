use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use toml::Value;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "filesystem error: {}", err),
            ConfigError::Parse(err) => write!(f, "invalid config file: {}", err),
            ConfigError::Invalid(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parse(value)
    }
}

/// Values from the `[defaults]` table. Command line flags win over these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    pub fping: Option<PathBuf>,
    pub period_ms: Option<u64>,
    pub summary_secs: Option<u64>,
    pub backoff: Option<f64>,
    pub retries: Option<u32>,
    pub tos: Option<u8>,
    pub format: Option<String>,
}

pub struct ConfigStore {
    path: PathBuf,
    defaults: Defaults,
}

impl ConfigStore {
    /// Load the config file; a missing file yields empty defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(default_path())
    }

    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self {
                path,
                defaults: Defaults::default(),
            });
        }
        let content = fs::read_to_string(&path)?;
        let parsed = Value::Table(content.parse::<toml::Table>()?);
        let defaults = parse_value(parsed)?;
        Ok(Self { path, defaults })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }
}

pub fn default_path() -> PathBuf {
    resolve_config_dir().join("config.toml")
}

fn parse_value(root: Value) -> Result<Defaults, ConfigError> {
    let mut data = Defaults::default();
    let Some(defaults) = root.get("defaults") else {
        return Ok(data);
    };
    let Some(defaults) = defaults.as_table() else {
        return Err(ConfigError::Invalid("[defaults] must be a table".into()));
    };

    if let Some(fping) = defaults.get("fping").and_then(Value::as_str) {
        data.fping = Some(PathBuf::from(fping));
    }
    data.period_ms = unsigned(defaults.get("period_ms"), "period_ms")?;
    data.summary_secs = unsigned(defaults.get("summary_secs"), "summary_secs")?;
    data.retries = unsigned(defaults.get("retries"), "retries")?
        .map(|v| u32::try_from(v).map_err(|_| out_of_range("retries", v)))
        .transpose()?;
    data.tos = unsigned(defaults.get("tos"), "tos")?
        .map(|v| u8::try_from(v).map_err(|_| out_of_range("tos", v)))
        .transpose()?;
    if let Some(backoff_value) = defaults.get("backoff") {
        if let Some(backoff) = backoff_value.as_float() {
            data.backoff = Some(backoff);
        } else if let Some(int_backoff) = backoff_value.as_integer() {
            data.backoff = Some(int_backoff as f64);
        }
    }
    if let Some(format) = defaults.get("format").and_then(Value::as_str) {
        data.format = Some(format.to_string());
    }
    Ok(data)
}

fn unsigned(value: Option<&Value>, key: &str) -> Result<Option<u64>, ConfigError> {
    match value.and_then(Value::as_integer) {
        None => Ok(None),
        Some(v) if v >= 0 => Ok(Some(v as u64)),
        Some(v) => Err(ConfigError::Invalid(format!("{key} must not be negative: {v}"))),
    }
}

fn out_of_range(key: &str, v: u64) -> ConfigError {
    ConfigError::Invalid(format!("{key} out of range: {v}"))
}

fn resolve_config_dir() -> PathBuf {
    if let Some(val) = env::var_os("FPMON_CONFIG_DIR") {
        let path = PathBuf::from(val);
        if path.is_absolute() {
            return path;
        }
        return env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| PathBuf::from("."));
    }
    if let Some(base) = dirs::config_dir() {
        return base.join("fpmon");
    }
    PathBuf::from(".fpmon")
}
