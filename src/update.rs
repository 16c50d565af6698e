use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{NaiveDate, Utc};

use crate::accounting;
use crate::api::{ClanApi, HttpClanApi};
use crate::cli::{LogArgs, UpdateArgs};
use crate::config::{Config, LogSettings};
use crate::cycle::{self, Classification, PeriodPolicy, PeriodTypePolicy, PriorState};
use crate::document::{DayKind, Document, WeekKind};
use crate::formats::PeriodType;
use crate::participants;
use crate::reconcile;
use crate::render;
use crate::store;

#[derive(Debug, Clone)]
pub struct Outcome {
    pub log_file: PathBuf,
    pub period_type: PeriodType,
    pub classification: Classification,
    pub participants: usize,
    pub document: String,
    pub changed: bool,
}

impl Outcome {
    pub fn status_line(&self) -> String {
        let c = &self.classification;
        let file = self.log_file.display();
        let week = match c.week {
            WeekKind::Numbered(n) => format!("Week {n}"),
            WeekKind::Colosseum => format!("Colosseum Week (week {})", c.week_number),
        };
        let day = match c.day {
            DayKind::Training => "Training Days".to_owned(),
            other => other.to_string(),
        };
        let position = format!(
            "{week}, {day} (cycle day {}, periodType={}, {} participants)",
            c.day_in_week, self.period_type, self.participants
        );

        if !self.changed {
            format!("✅ {file} already up to date: Season {}, {position}", c.season)
        } else if c.is_new_season {
            format!("🆕 Started Season {} in {file}: {position}", c.season)
        } else {
            format!("✅ Updated {file}: Season {}, {position}", c.season)
        }
    }

    pub fn report(&self, dry_run: bool) {
        if dry_run {
            print!("{}", self.document);
            tracing::info!("dry run: {}", self.status_line());
        } else {
            println!("{}", self.status_line());
        }
    }
}

pub fn run(args: UpdateArgs) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let settings = with_overrides(config.log, &args.log);
    let api = HttpClanApi::new(&config.api).context("create api client")?;
    let today = args.log.date.unwrap_or_else(|| Utc::now().date_naive());

    let outcome = execute(&api, &settings, &PeriodTypePolicy, today, args.log.dry_run)?;
    outcome.report(args.log.dry_run);
    Ok(())
}

/// Command-line flags win over environment settings.
pub fn with_overrides(mut settings: LogSettings, args: &LogArgs) -> LogSettings {
    if let Some(path) = &args.log_file {
        settings.log_file = path.clone();
    }
    if let Some(season) = args.starting_season {
        settings.starting_season = season;
    }
    if let Some(mode) = args.colosseum_accounting {
        settings.colosseum_accounting = Some(mode);
    }
    settings
}

/// Fetch, classify, render and reconcile one day, then write the log.
///
/// Nothing is written when the document is unchanged, on a dry run, or when
/// any step fails.
pub fn execute(
    api: &dyn ClanApi,
    settings: &LogSettings,
    policy: &dyn PeriodPolicy,
    today: NaiveDate,
    dry_run: bool,
) -> anyhow::Result<Outcome> {
    let members = api.members().context("fetch clan members")?;
    let race = api
        .current_river_race()
        .context("fetch current river race")?;
    tracing::info!(
        members = members.items.len(),
        period_type = %race.period_type,
        "fetched war state"
    );

    let phase = policy.phase(&race).ok_or_else(|| {
        anyhow::anyhow!(
            "current war period type is not recognized ({}); refusing to guess",
            race.period_type
        )
    })?;

    let snapshot = store::load(&settings.log_file)?;
    let doc = Document::parse(&snapshot.text);
    let prior = PriorState::from_document(&doc);
    let classification = cycle::classify(&prior, phase, today, settings.starting_season)?;
    tracing::info!(
        season = classification.season,
        week = %classification.week,
        day = %classification.day,
        cycle_day = classification.day_in_week,
        new_season = classification.is_new_season,
        "classified run"
    );

    let participants = participants::normalize(&members, &race);
    let week = doc
        .season(classification.season)
        .and_then(|s| s.week(classification.week));
    let prior_decks = accounting::prior_colosseum_decks(week, classification.day);
    let tallies = accounting::tally(
        &participants,
        classification.day,
        settings.colosseum_accounting,
        &prior_decks,
    )?;

    let block = render::render(classification.day, classification.date, today, tallies);
    let next = reconcile::reconcile(&doc, classification.season, classification.week, block)?;
    let document = next.to_markdown();
    let changed = document != snapshot.text;

    if changed && !dry_run {
        store::write_atomic(&settings.log_file, &document, &snapshot)
            .with_context(|| format!("write war log: {}", settings.log_file.display()))?;
        tracing::info!(path = %settings.log_file.display(), "war log written");
    }

    Ok(Outcome {
        log_file: settings.log_file.clone(),
        period_type: race.period_type,
        classification,
        participants: participants.len(),
        document,
        changed,
    })
}
