use crate::activity::daily_activity;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::lexical::{pos_stats, word_frequencies};
use crate::lexicon::{LexiconScorer, RuleTagger};
use crate::nlp::Stopwords;
use crate::partition::Partition;
use crate::sentiment::{sentiment_summary, SentimentSummary};
use crate::services::{PolarityScorer, PosTagger};
use crate::stats::{compute_basic_stats, BasicStats};
use chatlens_core::{
    AuthorReport, ChatReport, DailyActivityTable, Message, PosBuckets, Transcript,
    WordFrequencyTable,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Output of every aggregator before merging.
#[derive(Debug, Default)]
struct Aggregates {
    basic: BasicStats,
    activity: BTreeMap<String, DailyActivityTable>,
    words: BTreeMap<String, WordFrequencyTable>,
    pos: BTreeMap<String, PosBuckets>,
    sentiment: SentimentSummary,
}

enum Aggregate {
    Basic(BasicStats),
    Activity(BTreeMap<String, DailyActivityTable>),
    Words(BTreeMap<String, WordFrequencyTable>),
    Pos(AnalysisResult<BTreeMap<String, PosBuckets>>),
    Sentiment(AnalysisResult<SentimentSummary>),
}

#[derive(Debug, Clone, Copy)]
enum Job {
    Basic,
    Activity,
    Words,
    Pos,
    Sentiment,
}

impl Job {
    const ALL: [Job; 5] = [Job::Basic, Job::Activity, Job::Words, Job::Pos, Job::Sentiment];
}

/// Runs every aggregator over a transcript and merges the per-author reports.
#[derive(Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    scorer: Arc<dyn PolarityScorer>,
    tagger: Arc<dyn PosTagger>,
    stopwords: Arc<Stopwords>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("scorer", &self.scorer.name())
            .field("tagger", &self.tagger.name())
            .finish()
    }
}

impl Analyzer {
    /// Create an analyzer with injected scoring and tagging capabilities.
    pub fn new(
        config: AnalysisConfig,
        scorer: Arc<dyn PolarityScorer>,
        tagger: Arc<dyn PosTagger>,
    ) -> AnalysisResult<Self> {
        config.validate()?;
        let stopwords = Arc::new(Stopwords::with_extra(&config.lexical.extra_stopwords));
        Ok(Self {
            config,
            scorer,
            tagger,
            stopwords,
        })
    }

    /// Analyzer backed by the built-in lexicon scorer and rule tagger.
    pub fn with_defaults(config: AnalysisConfig) -> AnalysisResult<Self> {
        Self::new(config, Arc::new(LexiconScorer::new()), Arc::new(RuleTagger::new()))
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run every aggregator on the calling thread.
    pub fn analyze(&self, transcript: &Transcript) -> AnalysisResult<ChatReport> {
        let messages = transcript.messages();
        info!("Analyzing {} messages sequentially", messages.len());

        let mut aggregates = Aggregates::default();
        for job in Job::ALL {
            debug!("Running {:?} aggregator", job);
            self.store(&mut aggregates, self.run(job, messages))?;
        }
        Ok(self.merge(messages.len(), aggregates))
    }

    /// Run the aggregators as independent blocking tasks, at most
    /// `max_workers` at a time.
    ///
    /// The result equals [`Analyzer::analyze`] on the same transcript.
    pub async fn analyze_concurrent(
        &self,
        transcript: Arc<Transcript>,
    ) -> AnalysisResult<ChatReport> {
        info!(
            "Analyzing {} messages with up to {} workers",
            transcript.len(),
            self.config.max_workers
        );

        let mut set = tokio::task::JoinSet::new();
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.max_workers.max(1)));

        for job in Job::ALL {
            let analyzer = self.clone();
            let transcript_clone = transcript.clone();
            let semaphore_clone = semaphore.clone();
            set.spawn(async move {
                let _permit = semaphore_clone.acquire_owned().await.ok();
                tokio::task::spawn_blocking(move || {
                    debug!("Running {:?} aggregator", job);
                    analyzer.run(job, transcript_clone.messages())
                })
                .await
            });
        }

        let mut aggregates = Aggregates::default();
        while let Some(joined) = set.join_next().await {
            let aggregate = joined
                .map_err(|e| AnalysisError::Task(e.to_string()))?
                .map_err(|e| AnalysisError::Task(e.to_string()))?;
            if let Err(e) = self.store(&mut aggregates, aggregate) {
                set.abort_all();
                return Err(e);
            }
        }
        Ok(self.merge(transcript.len(), aggregates))
    }

    fn run(&self, job: Job, messages: &[Message]) -> Aggregate {
        match job {
            Job::Basic => Aggregate::Basic(compute_basic_stats(&Partition::new(messages))),
            Job::Activity => Aggregate::Activity(daily_activity(messages)),
            Job::Words => Aggregate::Words(word_frequencies(messages, &self.stopwords)),
            Job::Pos => Aggregate::Pos(pos_stats(
                messages,
                &self.stopwords,
                self.tagger.as_ref(),
                self.config.lexical.pos_top_k,
            )),
            Job::Sentiment => Aggregate::Sentiment(sentiment_summary(
                messages,
                self.scorer.as_ref(),
                &self.stopwords,
                self.config.sentiment.bad_word_threshold,
            )),
        }
    }

    fn store(&self, aggregates: &mut Aggregates, aggregate: Aggregate) -> AnalysisResult<()> {
        match aggregate {
            Aggregate::Basic(basic) => aggregates.basic = basic,
            Aggregate::Activity(activity) => aggregates.activity = activity,
            Aggregate::Words(words) => aggregates.words = words,
            Aggregate::Pos(pos) => aggregates.pos = pos?,
            Aggregate::Sentiment(sentiment) => aggregates.sentiment = sentiment?,
        }
        Ok(())
    }

    fn merge(&self, message_count: usize, mut aggregates: Aggregates) -> ChatReport {
        info!(
            "Merging reports for {} authors",
            aggregates.basic.authors.len()
        );
        let top_words = self.config.lexical.report_top_words;
        let bad_words = self.config.sentiment.report_bad_words;
        let sentiment = &mut aggregates.sentiment;

        let authors = aggregates
            .basic
            .authors
            .into_iter()
            .map(|(author, stats)| {
                let mut words_not_to_say = sentiment
                    .words_not_to_say
                    .remove(&author)
                    .unwrap_or_default();
                words_not_to_say.truncate(bad_words);

                let report = AuthorReport {
                    stats,
                    daily_activity: aggregates.activity.remove(&author).unwrap_or_default(),
                    top_words: aggregates
                        .words
                        .remove(&author)
                        .map(|table| table.top(top_words))
                        .unwrap_or_default(),
                    sentiment: sentiment.profiles.remove(&author).unwrap_or_default(),
                    confrontational_index: sentiment
                        .confrontation
                        .remove(&author)
                        .unwrap_or_default(),
                    parts_of_speech: aggregates.pos.remove(&author).unwrap_or_default(),
                    words_not_to_say,
                    author: author.clone(),
                };
                (author, report)
            })
            .collect();

        ChatReport {
            message_count,
            median_gap_seconds: aggregates.basic.median_gap_seconds as f64,
            authors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_core::PolarityScores;
    use chrono::NaiveDate;

    fn msg(day: u32, hour: u32, author: &str, text: &str) -> Message {
        let ts = NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Message::new(ts, author, text)
    }

    fn sample() -> Transcript {
        Transcript::new(vec![
            msg(1, 9, "Ana", "I love this pizza so much"),
            msg(1, 10, "Ana", "pizza pizza"),
            msg(1, 11, "Ben", "this is stupid"),
            msg(2, 9, "Ana", "whatever, stupid pizza"),
            msg(3, 9, "Ben", ""),
        ])
    }

    fn analyzer() -> Analyzer {
        Analyzer::with_defaults(AnalysisConfig::default()).unwrap()
    }

    struct FailingScorer;

    impl PolarityScorer for FailingScorer {
        fn polarity(&self, _text: &str) -> AnalysisResult<PolarityScores> {
            Err(AnalysisError::service("offline"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn every_author_gets_a_complete_report() {
        let report = analyzer().analyze(&sample()).unwrap();

        assert_eq!(report.message_count, 5);
        assert_eq!(report.authors.len(), 2);

        let ana = report.author("Ana").unwrap();
        assert_eq!(ana.stats.total_messages, 3);
        assert_eq!(ana.top_words[0].word, "pizza");
        assert_eq!(ana.top_words[0].count, 4);
        assert_eq!(ana.daily_activity.total(), 3);

        let ben = report.author("Ben").unwrap();
        assert_eq!(ben.stats.total_messages, 2);
        assert!(ben.confrontational_index > 0.0);
        assert_eq!(ben.words_not_to_say, vec!["stupid"]);
    }

    #[test]
    fn report_lists_are_truncated_by_config() {
        let mut config = AnalysisConfig::default();
        config.lexical.report_top_words = 1;
        config.sentiment.report_bad_words = 0;
        let report = Analyzer::with_defaults(config)
            .unwrap()
            .analyze(&sample())
            .unwrap();

        let ana = report.author("Ana").unwrap();
        assert_eq!(ana.top_words.len(), 1);
        assert!(ana.words_not_to_say.is_empty());
    }

    #[test]
    fn empty_transcript_gives_empty_report() {
        let report = analyzer().analyze(&Transcript::default()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.median_gap_seconds, 0.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.max_workers = 0;
        assert!(matches!(
            Analyzer::with_defaults(config),
            Err(AnalysisError::Config(_))
        ));
    }

    #[test]
    fn scorer_failure_aborts_analysis() {
        let analyzer = Analyzer::new(
            AnalysisConfig::default(),
            Arc::new(FailingScorer),
            Arc::new(RuleTagger::new()),
        )
        .unwrap();
        assert!(analyzer.analyze(&sample()).is_err());
    }

    #[tokio::test]
    async fn concurrent_matches_sequential() {
        let analyzer = analyzer();
        let transcript = sample();
        let sequential = analyzer.analyze(&transcript).unwrap();
        let concurrent = analyzer
            .analyze_concurrent(Arc::new(transcript))
            .await
            .unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn concurrent_single_worker_still_completes() {
        let mut config = AnalysisConfig::default();
        config.max_workers = 1;
        let analyzer = Analyzer::with_defaults(config).unwrap();
        let report = analyzer
            .analyze_concurrent(Arc::new(sample()))
            .await
            .unwrap();
        assert_eq!(report.authors.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_scorer_failure_propagates() {
        let analyzer = Analyzer::new(
            AnalysisConfig::default(),
            Arc::new(FailingScorer),
            Arc::new(RuleTagger::new()),
        )
        .unwrap();
        let err = analyzer
            .analyze_concurrent(Arc::new(sample()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::AnalysisService(_)));
    }
}
