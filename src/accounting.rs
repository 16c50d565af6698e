use std::collections::HashMap;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::document::{DayKind, Week};
use crate::participants::Participant;
use crate::render::Tally;

pub const DECKS_PER_DAY: u32 = 4;

/// How colosseum days count decks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColosseumAccounting {
    /// `decksUsedToday`, capped at 4.
    Daily,
    /// The raw cumulative total, out of `day × 4`.
    Cumulative,
    /// Cumulative total minus what earlier colosseum days already logged.
    Delta,
}

impl FromStr for ColosseumAccounting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as clap::ValueEnum>::from_str(s.trim(), true)
    }
}

/// Decks already logged per player on colosseum days before `day`.
pub fn prior_colosseum_decks(week: Option<&Week>, day: DayKind) -> HashMap<String, u32> {
    let mut totals = HashMap::new();
    let (Some(week), DayKind::Colosseum(index)) = (week, day) else {
        return totals;
    };
    for block in &week.days {
        let DayKind::Colosseum(n) = block.kind else {
            continue;
        };
        if n >= index {
            continue;
        }
        for row in &block.rows {
            *totals.entry(row.name.clone()).or_insert(0) += row.decks;
        }
    }
    totals
}

pub fn tally(
    participants: &[Participant],
    day: DayKind,
    accounting: Option<ColosseumAccounting>,
    prior: &HashMap<String, u32>,
) -> Result<Vec<Tally>, ConfigError> {
    let entry = |p: &Participant, decks: u32, max_decks: u32| Tally {
        tag: p.tag.clone(),
        name: p.name.clone(),
        decks,
        max_decks,
        fame: p.fame,
    };

    let tallies: Vec<Tally> = match day {
        // The training table is cumulative over the span.
        DayKind::Training => participants
            .iter()
            .map(|p| entry(p, p.decks_used, DECKS_PER_DAY))
            .collect(),
        DayKind::Battle(_) => participants
            .iter()
            .map(|p| entry(p, p.decks_used_today.unwrap_or(p.decks_used), DECKS_PER_DAY))
            .collect(),
        DayKind::Colosseum(index) => {
            let accounting = accounting.ok_or(ConfigError::ColosseumAccountingUnset)?;
            participants
                .iter()
                .map(|p| match accounting {
                    ColosseumAccounting::Daily => entry(
                        p,
                        p.decks_used_today
                            .unwrap_or(p.decks_used)
                            .min(DECKS_PER_DAY),
                        DECKS_PER_DAY,
                    ),
                    ColosseumAccounting::Cumulative => {
                        entry(p, p.decks_used, u32::from(index) * DECKS_PER_DAY)
                    }
                    ColosseumAccounting::Delta => {
                        let logged = prior.get(&p.name).copied().unwrap_or(0);
                        entry(p, colosseum_delta(p, logged), DECKS_PER_DAY)
                    }
                })
                .collect()
        }
    };
    Ok(tallies)
}

fn colosseum_delta(p: &Participant, logged: u32) -> u32 {
    match p.decks_used.checked_sub(logged) {
        Some(delta) if delta <= DECKS_PER_DAY => delta,
        _ => {
            tracing::warn!(
                player = %p.name,
                decks_used = p.decks_used,
                logged,
                "colosseum delta out of range; capping the cumulative total"
            );
            p.decks_used.min(DECKS_PER_DAY)
        }
    }
}
