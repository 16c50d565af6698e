use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberList {
    #[serde(default)]
    pub items: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub tag: String,
    #[serde(default)]
    pub name: String,
}

/// `GET /clans/{tag}/currentriverrace`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverRace {
    #[serde(default)]
    pub period_type: PeriodType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_index: Option<u32>,
    #[serde(default)]
    pub clan: RaceClan,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceClan {
    #[serde(default)]
    pub participants: Vec<RaceParticipant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceParticipant {
    pub tag: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub decks_used: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decks_used_today: Option<u32>,
    #[serde(default)]
    pub fame: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PeriodType {
    Training,
    WarDay,
    Colosseum,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::WarDay => "warDay",
            Self::Colosseum => "colosseum",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
