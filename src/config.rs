use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::auth::credentials::{Credentials, resolve_credentials};
use crate::auth::SignatureMethod;
use crate::{Result, YidunError};

pub const DEFAULT_BASE_URL: &str = "http://as.dun.163.com";
/// Older host for the image and video callback polls.
pub const CALLBACK_API_HOST: &str = "https://api.aq.163.com";
/// Host the list and live-wall queries were first published on.
pub const YUN_API_HOST: &str = "http://as.dun.163yun.com";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

const SIGNATURE_METHOD_KEY: &str = "YIDUN_SIGNATURE_METHOD";
const CONNECT_TIMEOUT_KEY: &str = "YIDUN_CONNECT_TIMEOUT_MS";
const READ_TIMEOUT_KEY: &str = "YIDUN_READ_TIMEOUT_MS";
const BASE_URL_KEY: &str = "YIDUN_BASE_URL";

/// `YIDUN_*` settings from a `.env` file, layered over the process environment.
#[derive(Clone, Default)]
pub struct Env {
    pub dotenv: BTreeMap<String, String>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.dotenv.keys().map(|key| key.as_str()).collect();
        f.debug_struct("Env").field("dotenv_keys", &keys).finish()
    }
}

impl Env {
    pub fn parse_dotenv(contents: &str) -> Self {
        Self {
            dotenv: parse_dotenv(contents),
        }
    }

    pub async fn load_dotenv(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(Self::parse_dotenv(&contents))
    }

    /// Dotenv value first, then the process environment. Blank values count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.dotenv.get(key) {
            return Some(value.clone());
        }
        std::env::var(key)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    pub(crate) fn require(&self, key: &str, what: &str) -> Result<String> {
        self.get(key)
            .ok_or_else(|| YidunError::InvalidConfig(format!("missing {what} (tried: {key})")))
    }

    pub(crate) fn millis(&self, key: &str) -> Result<Option<Duration>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|err| YidunError::InvalidConfig(format!("{key} must be milliseconds: {err}")))
    }
}

/// Parses `KEY=value` lines into a map; later lines win.
///
/// `export` prefixes are accepted. A value wrapped in matching quotes is taken
/// verbatim; in an unquoted value a `#` that opens the value or follows a space
/// starts a comment. Blank values are skipped.
pub fn parse_dotenv(contents: &str) -> BTreeMap<String, String> {
    contents
        .lines()
        .filter_map(parse_dotenv_line)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn parse_dotenv_line(raw_line: &str) -> Option<(&str, &str)> {
    let line = raw_line.trim();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").map_or(line, str::trim_start);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let value = value.trim();
    let value = match unquote(value) {
        Some(inner) => inner,
        None if value.starts_with('#') => "",
        None => value.split_once(" #").map_or(value, |(head, _)| head.trim_end()),
    };
    if value.trim().is_empty() {
        return None;
    }
    Some((key, value))
}

fn unquote(value: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
}

/// Everything needed to construct a [`crate::SignedRequestClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub signature_method: SignatureMethod,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            signature_method: SignatureMethod::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_signature_method(mut self, method: SignatureMethod) -> Self {
        self.signature_method = method;
        self
    }

    pub fn from_env(env: &Env) -> Result<Self> {
        let mut out = Self::new(resolve_credentials(env)?);
        if let Some(base_url) = env.get(BASE_URL_KEY) {
            out.base_url = base_url;
        }
        if let Some(method) = env.get(SIGNATURE_METHOD_KEY) {
            out.signature_method = method.parse()?;
        }
        if let Some(timeout) = env.millis(CONNECT_TIMEOUT_KEY)? {
            out.connect_timeout = timeout;
        }
        if let Some(timeout) = env.millis(READ_TIMEOUT_KEY)? {
            out.read_timeout = timeout;
        }
        out.validate()?;
        Ok(out)
    }

    /// Reads the `[yidun]` table of a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|err| YidunError::InvalidConfig(format!("invalid config toml: {err}")))?;
        let section = file.yidun;

        let mut credentials = Credentials::new(section.secret_id, section.secret_key)?;
        if let Some(business_id) = section.business_id {
            credentials = credentials.with_business_id(business_id);
        }

        let mut out = Self::new(credentials);
        if let Some(base_url) = section.base_url {
            out.base_url = base_url;
        }
        if let Some(method) = section.signature_method {
            out.signature_method = method.parse()?;
        }
        if let Some(ms) = section.connect_timeout_ms {
            out.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = section.read_timeout_ms {
            out.read_timeout = Duration::from_millis(ms);
        }
        out.validate()?;
        Ok(out)
    }

    pub async fn load_toml(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout.is_zero() {
            return Err(YidunError::InvalidConfig(
                "connect_timeout must be non-zero".to_string(),
            ));
        }
        if self.read_timeout.is_zero() {
            return Err(YidunError::InvalidConfig(
                "read_timeout must be non-zero".to_string(),
            ));
        }
        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(YidunError::InvalidConfig(format!(
                "base_url must be an http(s) url, got {base_url:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    yidun: ConfigSection,
}

#[derive(Debug, Deserialize)]
struct ConfigSection {
    secret_id: String,
    secret_key: String,
    #[serde(default)]
    business_id: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    signature_method: Option<String>,
    #[serde(default)]
    connect_timeout_ms: Option<u64>,
    #[serde(default)]
    read_timeout_ms: Option<u64>,
}
