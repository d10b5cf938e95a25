//! Registration time aggregation.
//!
//! Tallies parsed registration instants by hour of day and by weekday,
//! and ranks the most common values.

use crate::models::{FrequencyRanking, RegistrationTime};

/// Number of entries kept in a ranking.
pub const TOP_N: usize = 3;

/// Count occurrences of each key, keeping keys in first-encounter order.
pub fn tally<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: PartialEq,
    I: IntoIterator<Item = K>,
{
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match counts.iter_mut().find(|(seen, _)| *seen == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }

    counts
}

/// Sort a tally by descending count and keep the top `n` entries.
///
/// The sort is stable: equal counts stay in tally order.
pub fn top_by_count<K>(mut counts: Vec<(K, usize)>, n: usize) -> FrequencyRanking<K> {
    counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    counts.truncate(n);
    counts
}

/// The three most common registration hours.
pub fn peak_hours(timestamps: &[RegistrationTime]) -> FrequencyRanking<u32> {
    top_by_count(tally(timestamps.iter().map(RegistrationTime::hour)), TOP_N)
}

/// The three most common registration weekdays.
pub fn peak_weekdays(timestamps: &[RegistrationTime]) -> FrequencyRanking<&'static str> {
    top_by_count(
        tally(timestamps.iter().map(RegistrationTime::weekday_name)),
        TOP_N,
    )
}
