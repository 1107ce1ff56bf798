//! Derived numbers for display
//!
//! Rate stats computed from a player's cumulative counters.

mod rates;

pub use rates::{
    batting_average, format_rate, on_base_percentage, slugging_percentage, total_bases,
};
