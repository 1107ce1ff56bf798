//! Batting rate helpers

use scorebook_protocol::StatLine;

/// Singles count one base, doubles two, triples three, home runs four
pub fn total_bases(stats: &StatLine) -> u32 {
    let extra_base_hits = stats.doubles + stats.triples + stats.home_runs;
    let singles = stats.hits.saturating_sub(extra_base_hits);
    singles + stats.doubles * 2 + stats.triples * 3 + stats.home_runs * 4
}

/// Hits per at-bat (0 with no at-bats)
pub fn batting_average(stats: &StatLine) -> f64 {
    ratio(stats.hits, stats.at_bats)
}

/// (H + BB + HBP) / (PA + HBP + SF), 0 with no plate appearances
pub fn on_base_percentage(stats: &StatLine) -> f64 {
    if stats.plate_appearances == 0 {
        return 0.0;
    }
    ratio(
        stats.hits + stats.walks + stats.hit_by_pitch,
        stats.plate_appearances + stats.hit_by_pitch + stats.sac_flies,
    )
}

/// Total bases per at-bat (0 with no at-bats)
pub fn slugging_percentage(stats: &StatLine) -> f64 {
    ratio(total_bases(stats), stats.at_bats)
}

/// Three decimal places, e.g. `0.333`
pub fn format_rate(rate: f64) -> String {
    format!("{:.3}", rate)
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
