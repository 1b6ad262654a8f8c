use crate::error::AnalysisResult;
use chatlens_core::PolarityScores;

/// Sentence-level polarity scorer.
///
/// Failures are returned as [`crate::AnalysisError::AnalysisService`] and abort
/// the aggregation that requested the score.
pub trait PolarityScorer: Send + Sync {
    /// Score one message body.
    fn polarity(&self, text: &str) -> AnalysisResult<PolarityScores>;

    /// Get scorer name.
    fn name(&self) -> &str;
}

/// Part-of-speech tagger over an ordered token list.
pub trait PosTagger: Send + Sync {
    /// Tag `tokens`, returning one `(token, tag)` pair per input token.
    fn tag(&self, tokens: &[String]) -> AnalysisResult<Vec<(String, String)>>;

    /// Get tagger name.
    fn name(&self) -> &str;
}

/// Coarse word class derived from a Penn Treebank tag prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordClass {
    /// `NN*` tags.
    Noun,
    /// `VB*` tags.
    Verb,
    /// `JJ*` tags.
    Adjective,
}

impl WordClass {
    /// Class for `tag`, or `None` for tags outside the three families.
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.starts_with("NN") {
            Some(Self::Noun)
        } else if tag.starts_with("VB") {
            Some(Self::Verb)
        } else if tag.starts_with("JJ") {
            Some(Self::Adjective)
        } else {
            None
        }
    }
}
