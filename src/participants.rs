use std::collections::HashSet;

use crate::formats::{MemberList, RiverRace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub tag: String,
    pub name: String,
    /// Decks used over the whole race period, as reported by the API.
    pub decks_used: u32,
    pub decks_used_today: Option<u32>,
    pub fame: u32,
}

/// Keeps only participants whose tag is in the current member list.
pub fn normalize(members: &MemberList, race: &RiverRace) -> Vec<Participant> {
    let member_tags = members
        .items
        .iter()
        .map(|m| m.tag.as_str())
        .collect::<HashSet<_>>();

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for p in &race.clan.participants {
        if !member_tags.contains(p.tag.as_str()) {
            tracing::debug!(tag = %p.tag, "skipping participant who left the clan");
            continue;
        }
        if !seen.insert(p.tag.clone()) {
            continue;
        }

        let name = p
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown")
            .to_owned();

        out.push(Participant {
            tag: p.tag.clone(),
            name,
            decks_used: p.decks_used.unwrap_or(0),
            decks_used_today: p.decks_used_today,
            fame: p.fame.unwrap_or(0),
        });
    }
    out
}
