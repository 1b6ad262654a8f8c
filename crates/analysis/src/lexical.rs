use crate::error::{AnalysisError, AnalysisResult};
use crate::nlp::Stopwords;
use crate::services::{PosTagger, WordClass};
use chatlens_core::{Message, PosBuckets, WordFrequencyTable};
use std::collections::BTreeMap;
use tracing::debug;

/// Stopword-filtered word counts per author.
///
/// Every author with at least one message gets a table, possibly empty.
pub fn word_frequencies(
    messages: &[Message],
    stopwords: &Stopwords,
) -> BTreeMap<String, WordFrequencyTable> {
    let mut by_author: BTreeMap<String, WordFrequencyTable> = BTreeMap::new();
    for message in messages {
        let table = by_author.entry(message.author().to_string()).or_default();
        for word in stopwords.content_words(message.text()) {
            table.add(&word);
        }
    }
    by_author
}

/// Top nouns, verbs and adjectives per author.
///
/// Each author's tokens from non-empty messages are tagged in one call, in
/// chronological file order. Authors without a non-empty message are absent.
pub fn pos_stats(
    messages: &[Message],
    stopwords: &Stopwords,
    tagger: &dyn PosTagger,
    top_k: usize,
) -> AnalysisResult<BTreeMap<String, PosBuckets>> {
    let mut tokens_by_author: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for message in messages.iter().filter(|m| m.has_content()) {
        tokens_by_author
            .entry(message.author())
            .or_default()
            .extend(stopwords.content_alpha_tokens(message.text()));
    }

    debug!(
        "Tagging tokens for {} authors with {}",
        tokens_by_author.len(),
        tagger.name()
    );

    let mut out = BTreeMap::new();
    for (author, tokens) in tokens_by_author {
        let tagged = tagger.tag(&tokens)?;
        if tagged.len() != tokens.len() {
            return Err(AnalysisError::service(format!(
                "{} returned {} tags for {} tokens",
                tagger.name(),
                tagged.len(),
                tokens.len()
            )));
        }
        out.insert(author.to_string(), bucket_tags(&tagged, top_k));
    }
    Ok(out)
}

fn bucket_tags(tagged: &[(String, String)], top_k: usize) -> PosBuckets {
    let mut nouns = WordFrequencyTable::new();
    let mut verbs = WordFrequencyTable::new();
    let mut adjectives = WordFrequencyTable::new();

    for (word, tag) in tagged {
        match WordClass::from_tag(tag) {
            Some(WordClass::Noun) => nouns.add(word),
            Some(WordClass::Verb) => verbs.add(word),
            Some(WordClass::Adjective) => adjectives.add(word),
            None => {}
        }
    }

    let words = |table: &WordFrequencyTable| -> Vec<String> {
        table.top(top_k).into_iter().map(|entry| entry.word).collect()
    };

    PosBuckets {
        nouns: words(&nouns),
        verbs: words(&verbs),
        adjectives: words(&adjectives),
    }
}
