use crate::partition::Partition;
use chatlens_core::constants::{EXIT_GAP_MULTIPLIER, SECONDS_PER_DAY};
use chatlens_core::{AuthorStatsRecord, Message};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Basic statistics for every author plus the shared median gap they were computed with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicStats {
    /// Median gap between consecutive messages in global order, in seconds.
    pub median_gap_seconds: i64,
    /// Records keyed by author.
    pub authors: BTreeMap<String, AuthorStatsRecord>,
}

/// Per-author activity and timing metrics.
pub fn basic_stats(messages: &[Message]) -> BTreeMap<String, AuthorStatsRecord> {
    compute_basic_stats(&Partition::new(messages)).authors
}

/// Compute basic statistics from prepared orderings.
///
/// The median gap is derived once from the global order before any author
/// is visited and is read-only afterwards.
pub fn compute_basic_stats(partition: &Partition<'_>) -> BasicStats {
    let gaps = consecutive_gaps(partition.global());
    let median_gap_seconds = median_gap(&gaps);
    let exit_threshold = median_gap_seconds as f64 * EXIT_GAP_MULTIPLIER;
    let streaks = longest_streaks(partition.global());

    debug!(
        "Computing basic stats for {} authors (median gap {}s)",
        partition.author_count(),
        median_gap_seconds
    );

    let authors = partition
        .authors()
        .map(|(author, ordered)| {
            let silences = consecutive_gaps(ordered);
            let record = AuthorStatsRecord {
                total_messages: ordered.len() as u64,
                average_words_per_message: average_words(ordered),
                longest_silence_days: silences
                    .iter()
                    .max()
                    .map(|&longest| round_to(longest as f64 / SECONDS_PER_DAY, 2))
                    .unwrap_or(0.0),
                longest_streak: streaks.get(author).copied().unwrap_or(1),
                mid_conversation_exits: silences
                    .iter()
                    .filter(|&&silence| silence as f64 > exit_threshold)
                    .count() as u64,
                active_span_days: round_to(active_span_seconds(ordered) as f64 / SECONDS_PER_DAY, 2),
            };
            (author.to_string(), record)
        })
        .collect();

    BasicStats {
        median_gap_seconds,
        authors,
    }
}

/// Differences in seconds between consecutive messages of an ordered sequence.
pub fn consecutive_gaps(ordered: &[&Message]) -> Vec<i64> {
    ordered
        .windows(2)
        .map(|pair| (pair[1].timestamp() - pair[0].timestamp()).num_seconds())
        .collect()
}

/// Element at index `len / 2` of the ascending-sorted gaps, or 0 for no gaps.
///
/// For even lengths this picks the upper of the two middle elements rather
/// than averaging them.
pub fn median_gap(gaps: &[i64]) -> i64 {
    if gaps.is_empty() {
        return 0;
    }
    let mut sorted = gaps.to_vec();
    sorted.sort_unstable();
    sorted[sorted.len() / 2]
}

/// Longest run of consecutive same-author messages in global order, per author.
pub fn longest_streaks<'a>(global: &[&'a Message]) -> HashMap<&'a str, u64> {
    let mut longest: HashMap<&str, u64> = HashMap::new();
    let mut run_author = "";
    let mut run = 0u64;

    for (i, message) in global.iter().enumerate() {
        let author = message.author();
        if i > 0 && author == run_author {
            run += 1;
        } else {
            run_author = author;
            run = 1;
        }
        let best = longest.entry(author).or_insert(0);
        *best = (*best).max(run);
    }

    longest
}

fn average_words(ordered: &[&Message]) -> f64 {
    if ordered.is_empty() {
        return 0.0;
    }
    let total: usize = ordered.iter().map(|message| message.word_count()).sum();
    round_to(total as f64 / ordered.len() as f64, 2)
}

fn active_span_seconds(ordered: &[&Message]) -> i64 {
    match (ordered.first(), ordered.last()) {
        (Some(first), Some(last)) => (last.timestamp() - first.timestamp()).num_seconds(),
        _ => 0,
    }
}

/// Round to `decimals` places, ties to even.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
