//! Messages, transcripts and the per-author report model.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A single chat message reassembled from one header line and its continuations.
///
/// Messages are immutable once built; the parser folds continuation lines
/// before constructing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    timestamp: NaiveDateTime,
    author: String,
    text: String,
}

impl Message {
    /// Create a new message.
    pub fn new(timestamp: NaiveDateTime, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            author: author.into(),
            text: text.into(),
        }
    }

    /// Local date-time the message was sent.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Raw display name of the sender.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Message body; may contain embedded newlines.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Calendar day the message belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Number of whitespace-delimited tokens in the body.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the body has any non-whitespace content.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Parsed transcript in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Wrap a message sequence.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Messages in file order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no message survived parsing.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Sorted, de-duplicated author names.
    pub fn authors(&self) -> Vec<&str> {
        self.messages
            .iter()
            .map(Message::author)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Consume the transcript and return its messages.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

/// Per-author activity and timing metrics.
///
/// The key set is fixed; every record carries all six metrics even when a
/// value is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthorStatsRecord {
    #[serde(rename = "Total messages")]
    /// Total number of messages sent.
    pub total_messages: u64,
    #[serde(rename = "Average words per message")]
    /// Average word count per message.
    pub average_words_per_message: f64,
    #[serde(rename = "Longest silence (days)")]
    /// Longest gap between messages, in days.
    pub longest_silence_days: f64,
    #[serde(rename = "Longest streak (messages)")]
    /// Longest run of consecutive messages.
    pub longest_streak: u64,
    #[serde(rename = "Mid-conversation exits")]
    /// Number of mid-conversation exits.
    pub mid_conversation_exits: u64,
    #[serde(rename = "Active span (days)")]
    /// Days between first and last message.
    pub active_span_days: f64,
}

impl AuthorStatsRecord {
    /// Display keys, in report order.
    pub const KEYS: [&'static str; 6] = [
        "Total messages",
        "Average words per message",
        "Longest silence (days)",
        "Longest streak (messages)",
        "Mid-conversation exits",
        "Active span (days)",
    ];

    /// All metrics as `(display key, value)` pairs.
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            (Self::KEYS[0], self.total_messages as f64),
            (Self::KEYS[1], self.average_words_per_message),
            (Self::KEYS[2], self.longest_silence_days),
            (Self::KEYS[3], self.longest_streak as f64),
            (Self::KEYS[4], self.mid_conversation_exits as f64),
            (Self::KEYS[5], self.active_span_days),
        ]
    }

    /// Look up a metric by its display key.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }
}

/// Messages per calendar day for one author. Days without messages are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyActivityTable {
    days: BTreeMap<NaiveDate, u64>,
}

impl DailyActivityTable {
    /// Count one message on `day`.
    pub fn record(&mut self, day: NaiveDate) {
        *self.days.entry(day).or_insert(0) += 1;
    }

    /// Count for `day`, zero when absent.
    pub fn count(&self, day: NaiveDate) -> u64 {
        self.days.get(&day).copied().unwrap_or(0)
    }

    /// Count for an ISO `YYYY-MM-DD` key.
    pub fn count_iso(&self, key: &str) -> u64 {
        key.parse::<NaiveDate>()
            .map(|day| self.count(day))
            .unwrap_or(0)
    }

    /// Days with at least one message, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.days.iter().map(|(day, count)| (*day, *count))
    }

    /// Entries keyed by ISO date string, ascending.
    pub fn iso_entries(&self) -> Vec<(String, u64)> {
        self.iter()
            .map(|(day, count)| (day.format("%Y-%m-%d").to_string(), count))
            .collect()
    }

    /// Number of distinct active days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no day was recorded.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total messages across all days.
    pub fn total(&self) -> u64 {
        self.days.values().sum()
    }

    /// Every day from the first to the last active day, zero-filled.
    pub fn continuous(&self) -> Vec<(NaiveDate, u64)> {
        let (Some(first), Some(last)) = (
            self.days.keys().next().copied(),
            self.days.keys().next_back().copied(),
        ) else {
            return Vec::new();
        };

        let mut series = Vec::new();
        let mut day = first;
        while day <= last {
            series.push((day, self.count(day)));
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        series
    }
}

/// One word and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    /// Lowercased word.
    pub word: String,
    /// Occurrences across the author's messages.
    pub count: u64,
}

/// Word counts that remember the order each word first appeared in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl WordFrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `word`.
    pub fn add(&mut self, word: &str) {
        self.add_count(word, 1);
    }

    /// Count `count` occurrences of `word`.
    pub fn add_count(&mut self, word: &str, count: u64) {
        match self.index.get(word) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push((word.to_string(), count));
            }
        }
    }

    /// Occurrences of `word`, zero when absent.
    pub fn count(&self, word: &str) -> u64 {
        self.index
            .get(word)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no word was counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// The `k` most frequent words; equal counts keep first-appearance order.
    pub fn top(&self, k: usize) -> Vec<WordCount> {
        let mut ranked: Vec<&(String, u64)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(k)
            .map(|(word, count)| WordCount {
                word: word.clone(),
                count: *count,
            })
            .collect()
    }
}

impl<'a> Extend<&'a str> for WordFrequencyTable {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for word in iter {
            self.add(word);
        }
    }
}

impl<'a> FromIterator<&'a str> for WordFrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl Serialize for WordFrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(word, count)| (word, count)))
    }
}

/// Polarity triple returned by a sentence scorer for one message.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScores {
    /// Positive proportion, in [0, 1].
    pub pos: f64,
    /// Negative proportion, in [0, 1].
    pub neg: f64,
    /// Normalized overall tone, in [-1, 1].
    pub compound: f64,
}

impl PolarityScores {
    /// Negative intensity of a message: `max(neg, -compound)`.
    pub fn negative_intensity(&self) -> f64 {
        self.neg.max(-self.compound)
    }
}

/// Per-author emotion profile normalized against its largest absolute component.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentProfile {
    #[serde(rename = "Happiness")]
    /// Normalized happiness component.
    pub happiness: f64,
    #[serde(rename = "Sadness")]
    /// Normalized sadness component.
    pub sadness: f64,
    #[serde(rename = "Overall")]
    /// Normalized overall sentiment.
    pub overall: f64,
}

/// Most frequent nouns, verbs and adjectives of one author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosBuckets {
    /// Most frequent `NN*` words, most frequent first.
    pub nouns: Vec<String>,
    /// Most frequent `VB*` words.
    pub verbs: Vec<String>,
    /// Most frequent `JJ*` words.
    pub adjectives: Vec<String>,
}

/// Every derived statistic for one author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorReport {
    /// Author name as it appears in the transcript.
    pub author: String,
    /// The six basic metrics.
    pub stats: AuthorStatsRecord,
    /// Messages per calendar day.
    pub daily_activity: DailyActivityTable,
    /// Most frequent non-stopwords, ties in first-appearance order.
    pub top_words: Vec<WordCount>,
    /// Mean polarity over the author's non-empty messages.
    pub sentiment: SentimentProfile,
    /// Mean per-message negative intensity, in [0, 1].
    pub confrontational_index: f64,
    /// Noun, verb and adjective leaders.
    pub parts_of_speech: PosBuckets,
    /// Words ranked by the negative intensity attributed to them.
    pub words_not_to_say: Vec<String>,
}

/// Result of analysing one transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReport {
    /// Messages that survived parsing and filtering.
    pub message_count: usize,
    /// Global lower-median gap between consecutive messages, in seconds.
    pub median_gap_seconds: f64,
    /// Reports keyed by author display name.
    pub authors: BTreeMap<String, AuthorReport>,
}

impl ChatReport {
    /// Report for `author`, if they sent any message.
    pub fn author(&self, author: &str) -> Option<&AuthorReport> {
        self.authors.get(author)
    }

    /// Whether the transcript produced no authors.
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn stats_record_exposes_every_key() {
        let record = AuthorStatsRecord {
            total_messages: 3,
            average_words_per_message: 2.0,
            ..Default::default()
        };

        let keys: Vec<&str> = record.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, AuthorStatsRecord::KEYS.to_vec());
        assert_eq!(record.get("Total messages"), Some(3.0));
        assert_eq!(record.get("Mid-conversation exits"), Some(0.0));
        assert_eq!(record.get("Unknown"), None);
    }

    #[test]
    fn stats_record_serializes_display_keys() {
        let value = serde_json::to_value(AuthorStatsRecord::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 6);
        for key in AuthorStatsRecord::KEYS {
            assert!(object.contains_key(key), "missing key {}", key);
        }
    }

    #[test]
    fn continuous_fills_missing_days_with_zero() {
        let mut table = DailyActivityTable::default();
        table.record(day(2023, 1, 30));
        table.record(day(2023, 2, 2));
        table.record(day(2023, 2, 2));

        let series = table.continuous();
        assert_eq!(series.len(), 4);
        assert_eq!(series[0], (day(2023, 1, 30), 1));
        assert_eq!(series[1], (day(2023, 1, 31), 0));
        assert_eq!(series[3], (day(2023, 2, 2), 2));
        assert_eq!(table.len(), 2);
        assert_eq!(table.count_iso("2023-02-02"), 2);
        assert_eq!(table.iso_entries()[0].0, "2023-01-30");
    }

    #[test]
    fn top_words_keep_first_appearance_for_ties() {
        let table: WordFrequencyTable = ["pizza", "movie", "pizza", "beach", "movie", "cat"]
            .into_iter()
            .collect();

        let top = table.top(3);
        let words: Vec<&str> = top.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["pizza", "movie", "beach"]);
        assert_eq!(top[0].count, 2);
        assert_eq!(table.count("cat"), 1);
        assert_eq!(table.count("dog"), 0);
    }

    #[test]
    fn negative_intensity_uses_compound_when_neg_is_low() {
        let scores = PolarityScores {
            pos: 0.0,
            neg: 0.1,
            compound: -0.6,
        };
        assert!((scores.negative_intensity() - 0.6).abs() < 1e-12);
    }
}
