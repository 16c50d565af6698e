use std::path::PathBuf;
use std::time::Duration;

use crate::accounting::ColosseumAccounting;

pub const DEFAULT_API_BASE_URL: &str = "https://api.clashroyale.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STARTING_SEASON: u32 = 127;
pub const DEFAULT_LOG_FILE: &str = "war_log.md";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is missing; set it in the environment or in .env")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error(
        "a colosseum period needs WARLOG_COLOSSEUM_ACCOUNTING (daily, cumulative or delta) to be set"
    )]
    ColosseumAccountingUnset,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub log: LogSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api: ApiConfig::from_lookup(&lookup)?,
            log: LogSettings::from_lookup(&lookup)?,
        })
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    pub token: String,
    /// Without the leading `#`, upper-cased.
    pub clan_tag: String,
    pub base_url: String,
    pub timeout: Duration,
    pub proxy: Option<ProxyConfig>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("token", &"<redacted>")
            .field("clan_tag", &self.clan_tag)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl ApiConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = non_empty(lookup, "API_TOKEN").ok_or(ConfigError::Missing("API_TOKEN"))?;
        let clan_tag = non_empty(lookup, "CLAN_TAG")
            .map(|tag| normalize_clan_tag(&tag))
            .filter(|tag| !tag.is_empty())
            .ok_or(ConfigError::Missing("CLAN_TAG"))?;

        let base_url = non_empty(lookup, "WARLOG_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        url::Url::parse(&base_url).map_err(|err| ConfigError::Invalid {
            key: "WARLOG_API_BASE_URL",
            value: base_url.clone(),
            reason: err.to_string(),
        })?;

        let timeout_secs = parse_var(lookup, "WARLOG_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "WARLOG_TIMEOUT_SECS",
                value: "0".to_owned(),
                reason: "must be > 0".to_owned(),
            });
        }

        Ok(Self {
            token,
            clan_tag,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            proxy: ProxyConfig::from_lookup(lookup)?,
        })
    }
}

#[derive(Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ProxyConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let (Some(host), Some(port)) = (
            non_empty(lookup, "PROXY_IP"),
            parse_var::<u16>(lookup, "PROXY_PORT")?,
        ) else {
            return Ok(None);
        };
        Ok(Some(Self {
            host,
            port,
            username: non_empty(lookup, "PROXY_USERNAME"),
            password: non_empty(lookup, "PROXY_PASSWORD"),
        }))
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Settings that shape the log itself; none of them need network access.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub log_file: PathBuf,
    pub starting_season: u32,
    pub colosseum_accounting: Option<ColosseumAccounting>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            starting_season: DEFAULT_STARTING_SEASON,
            colosseum_accounting: None,
        }
    }
}

impl LogSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            log_file: non_empty(lookup, "WARLOG_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            starting_season: parse_var(lookup, "WARLOG_STARTING_SEASON")?
                .unwrap_or(defaults.starting_season),
            colosseum_accounting: parse_var(lookup, "WARLOG_COLOSSEUM_ACCOUNTING")?,
        })
    }
}

/// Loads `.env` from the working directory when present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(%err, "ignoring unreadable .env"),
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = non_empty(lookup, key) else {
        return Ok(None);
    };
    value
        .parse()
        .map(Some)
        .map_err(|err: T::Err| ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: err.to_string(),
        })
}

fn normalize_clan_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').to_ascii_uppercase()
}
