use crate::cli::StatusArgs;
use crate::config::LogSettings;
use crate::cycle::PriorState;
use crate::document::{DATE_FORMAT, Document};
use crate::store;

/// Prints where the log currently stands, without touching it.
pub fn run(args: StatusArgs) -> anyhow::Result<()> {
    let mut settings = LogSettings::from_env()?;
    if let Some(path) = args.log_file {
        settings.log_file = path;
    }

    let snapshot = store::load(&settings.log_file)?;
    let doc = Document::parse(&snapshot.text);
    doc.check_invariants()?;

    println!("{}", describe(&doc, &settings.log_file.display().to_string()));
    Ok(())
}

fn describe(doc: &Document, file: &str) -> String {
    let prior = PriorState::from_document(doc);
    let Some(season) = prior.season else {
        return format!("{file}: no seasons logged yet");
    };
    let Some(week) = doc.season(season).and_then(|s| s.top_week()) else {
        return format!("{file}: Season {season}, no weeks logged yet");
    };

    let mut line = format!("{file}: Season {season}, {}", week.kind);
    match week.days.first() {
        Some(day) => line.push_str(&format!(
            ", latest {} on {} (cycle day {})",
            day.kind,
            day.date.format(DATE_FORMAT),
            day.kind.cycle_day()
        )),
        None => line.push_str(", no days logged yet"),
    }
    line
}
