use crate::error::{AnalysisError, AnalysisResult};
use chatlens_core::constants::{
    DEFAULT_BAD_WORD_THRESHOLD, DEFAULT_POS_TOP_K, DEFAULT_REPORT_BAD_WORDS,
    DEFAULT_REPORT_TOP_WORDS,
};
use serde::{Deserialize, Serialize};

/// Configuration for analysis features
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum number of worker threads for concurrent aggregation
    pub max_workers: usize,

    /// Word frequency and part-of-speech configuration
    pub lexical: LexicalConfig,

    /// Sentiment configuration
    pub sentiment: SentimentConfig,
}

/// Lexical aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    /// Words kept per part-of-speech bucket
    pub pos_top_k: usize,

    /// Words copied from the frequency table into each author report
    pub report_top_words: usize,

    /// Stopwords added on top of the built-in list
    pub extra_stopwords: Vec<String>,
}

/// Sentiment aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Minimum accumulated negative attribution for a reported word
    pub bad_word_threshold: f64,

    /// Words-not-to-say copied into each author report
    pub report_bad_words: usize,
}

impl AnalysisConfig {
    /// Reject settings the aggregators cannot work with.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.max_workers == 0 {
            return Err(AnalysisError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        let threshold = self.sentiment.bad_word_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(AnalysisError::Config(format!(
                "bad_word_threshold must be a non-negative number, got {}",
                threshold
            )));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get(),
            lexical: LexicalConfig::default(),
            sentiment: SentimentConfig::default(),
        }
    }
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            pos_top_k: DEFAULT_POS_TOP_K,
            report_top_words: DEFAULT_REPORT_TOP_WORDS,
            extra_stopwords: Vec::new(),
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            bad_word_threshold: DEFAULT_BAD_WORD_THRESHOLD,
            report_bad_words: DEFAULT_REPORT_BAD_WORDS,
        }
    }
}
