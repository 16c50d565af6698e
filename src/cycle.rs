use chrono::NaiveDate;

use crate::document::{BATTLE_DAYS, DayKind, Document, WeekKind};
use crate::formats::{PeriodType, RiverRace};

const TRAINING_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Training,
    Battle,
    Colosseum,
}

pub trait PeriodPolicy {
    fn phase(&self, race: &RiverRace) -> Option<Phase>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodTypePolicy;

impl PeriodPolicy for PeriodTypePolicy {
    fn phase(&self, race: &RiverRace) -> Option<Phase> {
        match race.period_type {
            PeriodType::Training => Some(Phase::Training),
            PeriodType::WarDay => Some(Phase::Battle),
            PeriodType::Colosseum => Some(Phase::Colosseum),
            PeriodType::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    #[error("season {0} is the highest season number that can be logged")]
    SeasonOverflow(u32),
    #[error("season {season}: week {week} is the highest week number that can be logged")]
    WeekOverflow { season: u32, week: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorState {
    pub season: Option<u32>,
    pub week: Option<WeekKind>,
    /// Highest numbered week in the topmost season.
    pub last_numbered_week: u32,
    pub training_opened: Option<NaiveDate>,
    /// Battle or colosseum days of the topmost week as `(index, date)`.
    pub battle_days: Vec<(u8, NaiveDate)>,
}

impl PriorState {
    pub fn from_document(doc: &Document) -> Self {
        let Some(season) = doc.top_season() else {
            if !doc.is_empty() {
                tracing::warn!(
                    "war log has content but no recognizable season; starting from the seed position"
                );
            }
            return Self::default();
        };

        let last_numbered_week = season
            .weeks
            .iter()
            .filter_map(|w| match w.kind {
                WeekKind::Numbered(n) => Some(n),
                WeekKind::Colosseum => None,
            })
            .max()
            .unwrap_or(0);

        let week = season.top_week();
        let battle_days = week
            .map(|w| {
                w.days
                    .iter()
                    .filter_map(|d| Some((d.kind.battle_index()?, d.date)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            season: Some(season.number),
            week: week.map(|w| w.kind),
            last_numbered_week,
            training_opened: week.and_then(|w| w.training()).map(|d| d.date),
            battle_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub season: u32,
    pub week: WeekKind,
    /// Display number of the week; the colosseum week follows the last numbered one.
    pub week_number: u32,
    pub day: DayKind,
    pub date: NaiveDate,
    /// 1-based cycle day: 1–3 training, 4–7 battle.
    pub day_in_week: u8,
    pub is_colosseum: bool,
    pub is_new_season: bool,
    pub is_new_week: bool,
}

pub fn classify(
    prior: &PriorState,
    phase: Phase,
    today: NaiveDate,
    starting_season: u32,
) -> Result<Classification, CycleError> {
    let start = Start {
        phase,
        today,
        last_numbered_week: prior.last_numbered_week,
    };
    let rollover = Start {
        last_numbered_week: 0,
        ..start
    };

    let Some(season) = prior.season else {
        return Ok(rollover.week(starting_season, WeekKind::Numbered(1), true));
    };
    let next_season = || season.checked_add(1).ok_or(CycleError::SeasonOverflow(season));
    let next_week = |n: u32| {
        n.checked_add(1)
            .map(WeekKind::Numbered)
            .ok_or(CycleError::WeekOverflow { season, week: n })
    };

    let class = match (prior.week, phase) {
        (Some(WeekKind::Colosseum), Phase::Colosseum) => {
            match battle_slot(&prior.battle_days, today) {
                Slot::Day(index) => Classification::within(
                    season,
                    WeekKind::Colosseum,
                    prior.last_numbered_week.saturating_add(1),
                    DayKind::Colosseum(index),
                    today,
                ),
                Slot::NextWeek => {
                    tracing::warn!(
                        season,
                        "colosseum run falls past the last colosseum day; starting the next season"
                    );
                    rollover.week(next_season()?, WeekKind::Numbered(1), true)
                }
            }
        }
        (Some(WeekKind::Colosseum), _) => {
            rollover.week(next_season()?, WeekKind::Numbered(1), true)
        }
        // A season header with no weeks under it yet.
        (None, _) => start.week(season, WeekKind::Numbered(1), false),
        (Some(WeekKind::Numbered(_)), Phase::Colosseum) => {
            start.week(season, WeekKind::Colosseum, false)
        }
        (Some(WeekKind::Numbered(n)), Phase::Training) => {
            let stale = prior
                .training_opened
                .is_some_and(|opened| (today - opened).num_days() > TRAINING_DAYS);
            if !prior.battle_days.is_empty() || stale {
                return Ok(start.week(season, next_week(n)?, false));
            }
            let opened = prior.training_opened.unwrap_or(today);
            Classification {
                day_in_week: training_day(opened, today),
                ..Classification::within(
                    season,
                    WeekKind::Numbered(n),
                    n,
                    DayKind::Training,
                    opened,
                )
            }
        }
        (Some(WeekKind::Numbered(n)), Phase::Battle) => {
            let slot = match (prior.battle_days.is_empty(), prior.training_opened) {
                (true, Some(opened)) => first_battle_after_training(opened, today),
                _ => battle_slot(&prior.battle_days, today),
            };
            match slot {
                Slot::Day(index) => Classification::within(
                    season,
                    WeekKind::Numbered(n),
                    n,
                    DayKind::Battle(index),
                    today,
                ),
                Slot::NextWeek => start.week(season, next_week(n)?, false),
            }
        }
    };
    Ok(class)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Day(u8),
    NextWeek,
}

/// Picks the battle index for `today` from the days already in the week.
///
/// A date that is already logged keeps its index. Otherwise the index moves
/// with the calendar from the newest logged day, so skipped runs leave gaps.
fn battle_slot(days: &[(u8, NaiveDate)], today: NaiveDate) -> Slot {
    if let Some((index, _)) = days.iter().find(|(_, date)| *date == today) {
        return Slot::Day(*index);
    }
    let Some(&(newest, newest_date)) = days.iter().max_by_key(|(index, _)| *index) else {
        return Slot::Day(1);
    };

    let expected = i64::from(newest) + (today - newest_date).num_days();
    if expected > i64::from(BATTLE_DAYS) {
        return Slot::NextWeek;
    }
    let free = |index: u8| !days.iter().any(|(i, _)| *i == index);
    match u8::try_from(expected) {
        Ok(index) if index >= 1 && free(index) => return Slot::Day(index),
        _ => {}
    }

    // Logged dates disagree with one day per date; take a free index instead
    // of overwriting a day logged under another date.
    tracing::warn!(%today, "battle dates in this week are irregular; using the first free day");
    (1..=BATTLE_DAYS)
        .find(|index| free(*index))
        .map_or(Slot::NextWeek, Slot::Day)
}

fn first_battle_after_training(opened: NaiveDate, today: NaiveDate) -> Slot {
    let expected = (today - opened).num_days() - TRAINING_DAYS + 1;
    if expected > i64::from(BATTLE_DAYS) {
        return Slot::NextWeek;
    }
    u8::try_from(expected.max(1)).map_or(Slot::Day(1), Slot::Day)
}

fn training_day(opened: NaiveDate, today: NaiveDate) -> u8 {
    let elapsed = (today - opened).num_days().clamp(0, TRAINING_DAYS - 1);
    // clamp keeps this in 1..=3
    (elapsed + 1) as u8
}

#[derive(Debug, Clone, Copy)]
struct Start {
    phase: Phase,
    today: NaiveDate,
    last_numbered_week: u32,
}

impl Start {
    fn week(self, season: u32, numbered: WeekKind, new_season: bool) -> Classification {
        let (week, day) = match self.phase {
            Phase::Training => (numbered, DayKind::Training),
            Phase::Battle => (numbered, DayKind::Battle(1)),
            Phase::Colosseum => (WeekKind::Colosseum, DayKind::Colosseum(1)),
        };
        let week_number = match week {
            WeekKind::Numbered(n) => n,
            WeekKind::Colosseum => self.last_numbered_week.saturating_add(1),
        };
        Classification {
            is_new_season: new_season,
            is_new_week: true,
            ..Classification::within(season, week, week_number, day, self.today)
        }
    }
}

impl Classification {
    fn within(season: u32, week: WeekKind, week_number: u32, day: DayKind, date: NaiveDate) -> Self {
        Self {
            season,
            week,
            week_number,
            day,
            date,
            day_in_week: day.cycle_day(),
            is_colosseum: week == WeekKind::Colosseum,
            is_new_season: false,
            is_new_week: false,
        }
    }
}
