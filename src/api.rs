use std::path::Path;

use anyhow::Context as _;
use reqwest::header::ACCEPT;
use url::Url;

use crate::config::ApiConfig;
use crate::formats::{MemberList, RiverRace};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("GET {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {endpoint}: HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("GET {endpoint}: malformed response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The two read-only queries a run needs from the game API.
pub trait ClanApi {
    fn members(&self) -> Result<MemberList, FetchError>;
    fn current_river_race(&self) -> Result<RiverRace, FetchError>;
}

pub struct HttpClanApi {
    client: reqwest::blocking::Client,
    token: String,
    members_url: Url,
    river_race_url: Url,
}

impl HttpClanApi {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("warlog/", env!("CARGO_PKG_VERSION")));
        if let Some(proxy) = &config.proxy {
            let mut p = reqwest::Proxy::all(proxy.url())
                .with_context(|| format!("invalid proxy: {}", proxy.url()))?;
            if let Some(username) = proxy.username.as_deref() {
                p = p.basic_auth(username, proxy.password.as_deref().unwrap_or(""));
            }
            builder = builder.proxy(p);
        }
        let client = builder.build().context("build http client")?;

        Ok(Self {
            client,
            token: config.token.clone(),
            members_url: clan_endpoint(&config.base_url, &config.clan_tag, "members")?,
            river_race_url: clan_endpoint(&config.base_url, &config.clan_tag, "currentriverrace")?,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let endpoint = url.to_string();
        tracing::debug!(%endpoint, "fetching");

        let transport = |source| FetchError::Transport {
            endpoint: endpoint.clone(),
            source,
        };
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(transport)?;

        let status = response.status();
        let raw = response.text().map_err(transport)?;
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
                message: parse_error_message(&raw).unwrap_or(raw),
            });
        }

        serde_json::from_str(&raw).map_err(|source| FetchError::Decode { endpoint, source })
    }
}

impl ClanApi for HttpClanApi {
    fn members(&self) -> Result<MemberList, FetchError> {
        self.get_json(&self.members_url)
    }

    fn current_river_race(&self) -> Result<RiverRace, FetchError> {
        self.get_json(&self.river_race_url)
    }
}

/// `{base}/clans/%23{tag}/{resource}`
fn clan_endpoint(base_url: &str, clan_tag: &str, resource: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base_url).with_context(|| format!("parse api base url: {base_url}"))?;
    url.path_segments_mut()
        .map_err(|()| anyhow::anyhow!("api base url cannot have a path: {base_url}"))?
        .pop_if_empty()
        .push("clans")
        .push(&format!("#{clan_tag}"))
        .push(resource);
    Ok(url)
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    value
        .get("message")
        .or_else(|| value.get("reason"))?
        .as_str()
        .map(str::to_owned)
}

/// API responses saved to disk, served back through [`ClanApi`].
#[derive(Debug, Clone)]
pub struct SavedResponses {
    members: MemberList,
    river_race: RiverRace,
}

impl SavedResponses {
    pub fn load(members_path: &Path, river_race_path: &Path) -> anyhow::Result<Self> {
        let members = read_json(members_path).context("read members snapshot")?;
        let river_race = read_json(river_race_path).context("read river race snapshot")?;
        Ok(Self {
            members,
            river_race,
        })
    }
}

impl ClanApi for SavedResponses {
    fn members(&self) -> Result<MemberList, FetchError> {
        Ok(self.members.clone())
    }

    fn current_river_race(&self) -> Result<RiverRace, FetchError> {
        Ok(self.river_race.clone())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse json: {}", path.display()))
}
