use crate::document::{DayBlock, DayKind, Document, WeekKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("{day} cannot be logged under {week}")]
    IncompatibleWeek { week: WeekKind, day: DayKind },
}

/// Returns a copy of `doc` with `block` in season `season`, week `week`.
pub fn reconcile(
    doc: &Document,
    season: u32,
    week: WeekKind,
    block: DayBlock,
) -> Result<Document, ReconcileError> {
    if !week.accepts(block.kind) {
        return Err(ReconcileError::IncompatibleWeek {
            week,
            day: block.kind,
        });
    }

    let mut next = doc.clone();
    let target = next.season_mut(season).week_mut(week);
    match target.days.iter().position(|d| d.kind == block.kind) {
        Some(idx) => {
            tracing::debug!(%season, %week, day = %block.kind, "replacing day-block");
            target.days[idx] = block;
        }
        None => {
            tracing::debug!(%season, %week, day = %block.kind, "adding day-block");
            target.days.push(block);
        }
    }
    next.sort();

    debug_assert!(next.check_invariants().is_ok());
    Ok(next)
}
