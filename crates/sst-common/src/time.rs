//! Date handling for daily dataset resources.

use chrono::{Datelike, NaiveDate};

/// Zero-based index of `date` on its year's daily time axis.
pub fn day_index(date: NaiveDate) -> usize {
    date.ordinal0() as usize
}

/// Dataset-style date label, e.g. "2024-10-02".
pub fn date_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
