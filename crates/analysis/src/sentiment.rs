use crate::error::{AnalysisError, AnalysisResult};
use crate::nlp::Stopwords;
use crate::services::PolarityScorer;
use crate::stats::round_to;
use chatlens_core::{Message, PolarityScores, SentimentProfile};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Every polarity-derived statistic, computed from a single scoring pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentSummary {
    /// Normalized emotion profile per author.
    pub profiles: BTreeMap<String, SentimentProfile>,
    /// Mean negative intensity per author.
    pub confrontation: BTreeMap<String, f64>,
    /// Words ranked by accumulated negative attribution per author.
    pub words_not_to_say: BTreeMap<String, Vec<String>>,
}

#[derive(Default)]
struct AuthorAccumulator {
    messages: usize,
    happiness: f64,
    sadness: f64,
    overall: f64,
    intensity: f64,
    word_scores: Vec<(String, f64)>,
    word_index: HashMap<String, usize>,
    attributed: bool,
}

impl AuthorAccumulator {
    fn add_scores(&mut self, scores: &PolarityScores) {
        self.messages += 1;
        self.happiness += scores.pos;
        self.sadness += scores.neg;
        self.overall += scores.compound;
        self.intensity += scores.negative_intensity();
    }

    fn attribute(&mut self, word: &str, share: f64) {
        self.attributed = true;
        match self.word_index.get(word) {
            Some(&slot) => self.word_scores[slot].1 += share,
            None => {
                self.word_index.insert(word.to_string(), self.word_scores.len());
                self.word_scores.push((word.to_string(), share));
            }
        }
    }

    fn profile(&self) -> SentimentProfile {
        let n = self.messages.max(1) as f64;
        let (happiness, sadness, overall) = (self.happiness / n, self.sadness / n, self.overall / n);
        let largest = happiness.abs().max(sadness.abs()).max(overall.abs());
        let scale = if largest == 0.0 { 1.0 } else { largest };
        SentimentProfile {
            happiness: round_to(happiness / scale, 3),
            sadness: round_to(sadness / scale, 3),
            overall: round_to(overall / scale, 3),
        }
    }

    fn confrontation(&self) -> f64 {
        round_to(self.intensity / self.messages.max(1) as f64, 3)
    }

    fn ranked_words(&self, threshold: f64) -> Vec<String> {
        let mut kept: Vec<&(String, f64)> = self
            .word_scores
            .iter()
            .filter(|(_, score)| *score >= threshold)
            .collect();
        kept.sort_by(|a, b| b.1.total_cmp(&a.1));
        kept.into_iter().map(|(word, _)| word.clone()).collect()
    }
}

/// Score every non-empty message once and derive all sentiment statistics.
///
/// Authors without a non-empty message are absent from every map; authors
/// whose negative messages left no content words are absent from
/// `words_not_to_say`.
pub fn sentiment_summary(
    messages: &[Message],
    scorer: &dyn PolarityScorer,
    stopwords: &Stopwords,
    bad_word_threshold: f64,
) -> AnalysisResult<SentimentSummary> {
    let mut by_author: BTreeMap<&str, AuthorAccumulator> = BTreeMap::new();
    let mut scored = 0usize;

    for message in messages {
        let text = message.text().trim();
        if text.is_empty() {
            continue;
        }
        let scores = score(scorer, text)?;
        scored += 1;

        let acc = by_author.entry(message.author()).or_default();
        acc.add_scores(&scores);

        let intensity = scores.negative_intensity();
        if intensity <= 0.0 {
            continue;
        }
        let words = stopwords.content_words(text);
        if words.is_empty() {
            continue;
        }
        let share = intensity / words.len() as f64;
        for word in &words {
            acc.attribute(word, share);
        }
    }

    debug!("Scored {} messages with {}", scored, scorer.name());

    let mut summary = SentimentSummary::default();
    for (author, acc) in by_author {
        summary.profiles.insert(author.to_string(), acc.profile());
        summary
            .confrontation
            .insert(author.to_string(), acc.confrontation());
        if acc.attributed {
            summary
                .words_not_to_say
                .insert(author.to_string(), acc.ranked_words(bad_word_threshold));
        }
    }
    Ok(summary)
}

/// Normalized Happiness/Sadness/Overall profile per author.
pub fn sentiment_scores(
    messages: &[Message],
    scorer: &dyn PolarityScorer,
) -> AnalysisResult<BTreeMap<String, SentimentProfile>> {
    sentiment_summary(messages, scorer, &Stopwords::new(), f64::INFINITY)
        .map(|summary| summary.profiles)
}

/// Mean per-message negative intensity per author, in [0, 1].
pub fn confrontational_index(
    messages: &[Message],
    scorer: &dyn PolarityScorer,
) -> AnalysisResult<BTreeMap<String, f64>> {
    sentiment_summary(messages, scorer, &Stopwords::new(), f64::INFINITY)
        .map(|summary| summary.confrontation)
}

/// Words ranked by the negative intensity they were attributed, per author.
pub fn words_not_to_say(
    messages: &[Message],
    scorer: &dyn PolarityScorer,
    stopwords: &Stopwords,
    threshold: f64,
) -> AnalysisResult<BTreeMap<String, Vec<String>>> {
    sentiment_summary(messages, scorer, stopwords, threshold)
        .map(|summary| summary.words_not_to_say)
}

fn score(scorer: &dyn PolarityScorer, text: &str) -> AnalysisResult<PolarityScores> {
    let scores = scorer.polarity(text)?;
    if !(scores.pos.is_finite() && scores.neg.is_finite() && scores.compound.is_finite()) {
        return Err(AnalysisError::service(format!(
            "{} returned non-finite scores for message",
            scorer.name()
        )));
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn msg(author: &str, text: &str) -> Message {
        let ts = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Message::new(ts, author, text)
    }

    /// Looks scores up by exact message text; unknown text is neutral.
    struct TableScorer(Vec<(&'static str, PolarityScores)>);

    impl PolarityScorer for TableScorer {
        fn polarity(&self, text: &str) -> AnalysisResult<PolarityScores> {
            Ok(self
                .0
                .iter()
                .find(|(key, _)| *key == text)
                .map(|(_, scores)| *scores)
                .unwrap_or_default())
        }

        fn name(&self) -> &str {
            "table"
        }
    }

    struct FailingScorer;

    impl PolarityScorer for FailingScorer {
        fn polarity(&self, _text: &str) -> AnalysisResult<PolarityScores> {
            Err(AnalysisError::service("scorer offline"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn scores(pos: f64, neg: f64, compound: f64) -> PolarityScores {
        PolarityScores { pos, neg, compound }
    }

    #[test]
    fn profile_normalizes_by_largest_component() {
        let scorer = TableScorer(vec![("fine", scores(0.2, 0.1, 0.4))]);
        let profiles = sentiment_scores(&[msg("A", "fine")], &scorer).unwrap();

        assert_eq!(
            profiles["A"],
            SentimentProfile {
                happiness: 0.5,
                sadness: 0.25,
                overall: 1.0,
            }
        );
    }

    #[test]
    fn all_zero_profile_stays_zero() {
        let scorer = TableScorer(Vec::new());
        let profiles = sentiment_scores(&[msg("A", "meh")], &scorer).unwrap();
        assert_eq!(profiles["A"], SentimentProfile::default());
    }

    #[test]
    fn empty_messages_are_skipped() {
        let scorer = TableScorer(Vec::new());
        let profiles = sentiment_scores(&[msg("A", "  \n ")], &scorer).unwrap();
        assert!(profiles.is_empty());
    }

    #[test]
    fn confrontation_uses_negative_compound() {
        let scorer = TableScorer(vec![
            ("whatever", scores(0.0, 0.1, -0.6)),
            ("thanks", scores(0.8, 0.0, 0.7)),
        ]);
        let index =
            confrontational_index(&[msg("A", "whatever"), msg("A", "thanks")], &scorer).unwrap();
        assert_eq!(index["A"], 0.3);
    }

    #[test]
    fn confrontation_tie_rounds_to_even() {
        let scorer = TableScorer(vec![("meh", scores(0.0, 0.0625, 0.0))]);
        let index = confrontational_index(&[msg("A", "meh")], &scorer).unwrap();
        assert_eq!(index["A"], 0.062);
    }

    #[test]
    fn negative_intensity_is_spread_over_content_words() {
        let scorer = TableScorer(vec![
            ("stupid idea", scores(0.0, 0.8, -0.6)),
            ("the stupid", scores(0.0, 0.3, -0.2)),
            ("nice idea", scores(0.7, 0.0, 0.5)),
        ]);
        let messages = vec![
            msg("A", "stupid idea"),
            msg("A", "the stupid"),
            msg("A", "nice idea"),
        ];
        let words = words_not_to_say(&messages, &scorer, &Stopwords::new(), 0.3).unwrap();

        // stupid: 0.4 + 0.3 = 0.7, idea: 0.4
        assert_eq!(words["A"], vec!["stupid", "idea"]);

        let strict = words_not_to_say(&messages, &scorer, &Stopwords::new(), 0.5).unwrap();
        assert_eq!(strict["A"], vec!["stupid"]);
    }

    #[test]
    fn stopword_only_negative_messages_attribute_nothing() {
        let scorer = TableScorer(vec![("no way", scores(0.0, 0.9, -0.7))]);
        let stopwords = Stopwords::with_extra(["no", "way"]);
        let words = words_not_to_say(&[msg("A", "no way")], &scorer, &stopwords, 0.5).unwrap();
        assert!(!words.contains_key("A"));
    }

    #[test]
    fn scorer_failure_propagates() {
        let err = sentiment_scores(&[msg("A", "hi")], &FailingScorer).unwrap_err();
        assert!(matches!(err, AnalysisError::AnalysisService(_)));
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        let scorer = TableScorer(vec![("odd", scores(f64::NAN, 0.0, 0.0))]);
        assert!(sentiment_scores(&[msg("A", "odd")], &scorer).is_err());
    }
}
