use anyhow::Context as _;
use chrono::Utc;

use crate::api::SavedResponses;
use crate::cli::ApplyArgs;
use crate::config::LogSettings;
use crate::cycle::PeriodTypePolicy;
use crate::update;

/// Runs the update pipeline against saved API responses instead of the network.
pub fn run(args: ApplyArgs) -> anyhow::Result<()> {
    let settings = update::with_overrides(LogSettings::from_env()?, &args.log);
    let api = SavedResponses::load(&args.members, &args.war).context("load saved responses")?;
    let today = args.log.date.unwrap_or_else(|| Utc::now().date_naive());

    let outcome = update::execute(&api, &settings, &PeriodTypePolicy, today, args.log.dry_run)?;
    outcome.report(args.log.dry_run);
    Ok(())
}
