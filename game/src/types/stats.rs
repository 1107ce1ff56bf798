//! Per-plate-appearance stat increments

use scorebook_protocol::{OutcomeKey, StatField, StatLine};

/// Counters to add to the batter's record for a completed plate appearance
///
/// Returns `None` for outcomes that do not end the plate appearance.
pub fn plate_appearance_delta(outcome: OutcomeKey, runs_scored: u32) -> Option<StatLine> {
    if !outcome.is_final() {
        return None;
    }

    let mut delta = StatLine::new();
    delta.add(StatField::PlateAppearances, 1);

    if outcome.is_at_bat() {
        delta.add(StatField::AtBats, 1);
    }

    if outcome.is_hit() {
        delta.add(StatField::Hits, 1);
    }

    match outcome {
        OutcomeKey::Double => delta.add(StatField::Doubles, 1),
        OutcomeKey::Triple => delta.add(StatField::Triples, 1),
        OutcomeKey::HomeRun => delta.add(StatField::HomeRuns, 1),
        OutcomeKey::Walk => delta.add(StatField::Walks, 1),
        OutcomeKey::Strikeout => delta.add(StatField::Strikeouts, 1),
        _ => {}
    }

    if runs_scored > 0 {
        delta.add(StatField::Rbis, runs_scored);
    }

    Some(delta)
}
