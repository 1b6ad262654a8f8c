//! Dependency-free stand-ins for the polarity scorer and part-of-speech tagger.
//!
//! `LexiconScorer` follows the valence-aware approach of rule-based social
//! media scorers: a small word lexicon, boosters, negation flipping, capital
//! emphasis and exclamation amplification, normalized into a compound score.
//! `RuleTagger` combines closed-class word lists with suffix rules and emits
//! Penn Treebank tags.

use crate::error::AnalysisResult;
use crate::services::{PolarityScorer, PosTagger};
use crate::stats::round_to;
use chatlens_core::PolarityScores;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

const NORMALIZATION_ALPHA: f64 = 15.0;
const BOOSTER_INCREMENT: f64 = 0.293;
const CAPS_INCREMENT: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const NEGATION_WINDOW: usize = 3;

static VALENCE: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("love", 3.2), ("loved", 2.9), ("lovely", 2.8), ("like", 1.5), ("liked", 1.8),
        ("good", 1.9), ("great", 3.1), ("nice", 1.8), ("happy", 2.7), ("glad", 2.0),
        ("awesome", 3.1), ("amazing", 2.8), ("wonderful", 2.7), ("best", 3.2), ("fun", 2.3),
        ("funny", 1.9), ("cool", 1.3), ("thanks", 1.9), ("thank", 1.5), ("excited", 1.4),
        ("beautiful", 2.9), ("perfect", 2.7), ("sweet", 2.0), ("cute", 2.0), ("proud", 2.1),
        ("yay", 2.4), ("haha", 1.6), ("lol", 1.8), ("enjoy", 2.2), ("win", 2.8),
        ("hope", 1.9), ("care", 2.2), ("miss", -0.6), ("sorry", -0.3), ("bad", -2.5),
        ("sad", -2.1), ("hate", -2.7), ("hated", -3.2), ("angry", -2.3), ("mad", -2.2),
        ("annoying", -1.7), ("annoyed", -1.6), ("awful", -2.0), ("terrible", -2.1),
        ("horrible", -2.5), ("worst", -3.1), ("stupid", -2.4), ("idiot", -2.3), ("dumb", -2.3),
        ("ugly", -2.3), ("boring", -1.3), ("tired", -1.9), ("upset", -1.6), ("cry", -2.1),
        ("crying", -2.1), ("hurt", -2.4), ("pain", -2.3), ("wrong", -2.1), ("fail", -2.5),
        ("failed", -2.3), ("problem", -1.7), ("worried", -1.2), ("scared", -1.9),
        ("lonely", -2.0), ("sick", -1.7), ("shut", -0.8), ("damn", -1.7), ("hell", -3.6),
        ("crap", -1.6), ("shit", -2.6), ("fuck", -2.5), ("ridiculous", -1.5), ("whatever", -0.5),
        ("disappointed", -1.9), ("liar", -2.6), ("lie", -1.6), ("blame", -1.4), ("fault", -1.7),
        ("jealous", -2.0), ("selfish", -2.1), ("rude", -2.0), ("useless", -1.8),
    ]
    .into_iter()
    .collect()
});

static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("absolutely", BOOSTER_INCREMENT), ("very", BOOSTER_INCREMENT),
        ("really", BOOSTER_INCREMENT), ("so", BOOSTER_INCREMENT), ("totally", BOOSTER_INCREMENT),
        ("extremely", BOOSTER_INCREMENT), ("super", BOOSTER_INCREMENT),
        ("incredibly", BOOSTER_INCREMENT), ("completely", BOOSTER_INCREMENT),
        ("barely", -BOOSTER_INCREMENT), ("kinda", -BOOSTER_INCREMENT),
        ("slightly", -BOOSTER_INCREMENT), ("somewhat", -BOOSTER_INCREMENT),
        ("little", -BOOSTER_INCREMENT),
    ]
    .into_iter()
    .collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "can't",
        "cant", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "isn't", "isnt",
        "aren't", "arent", "wasn't", "wasnt", "won't", "wont", "wouldn't", "wouldnt", "shouldn't",
        "couldn't", "ain't", "aint", "without",
    ]
    .into_iter()
    .collect()
});

/// Lexicon-based polarity scorer producing `pos`/`neg`/`compound` triples.
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    /// Create a scorer over the built-in lexicon.
    pub fn new() -> Self {
        Self
    }

    fn token_valences(tokens: &[&str], shouting: bool) -> Vec<f64> {
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        lowered
            .iter()
            .enumerate()
            .map(|(i, word)| {
                if BOOSTERS.contains_key(word.as_str()) {
                    return 0.0;
                }
                let Some(&base) = VALENCE.get(word.as_str()) else {
                    return 0.0;
                };

                let mut valence = base;
                if !shouting && is_caps(tokens[i]) {
                    valence += CAPS_INCREMENT * base.signum();
                }

                let window = &lowered[i.saturating_sub(NEGATION_WINDOW)..i];
                for (distance, prior) in window.iter().rev().enumerate() {
                    if let Some(&boost) = BOOSTERS.get(prior.as_str()) {
                        let damping = match distance {
                            0 => 1.0,
                            1 => 0.95,
                            _ => 0.9,
                        };
                        valence += boost * base.signum() * damping;
                    }
                }
                if window.iter().any(|prior| NEGATIONS.contains(prior.as_str())) {
                    valence *= NEGATION_SCALAR;
                }
                valence
            })
            .collect()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> AnalysisResult<PolarityScores> {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.is_empty() {
            return Ok(PolarityScores::default());
        }

        let cased: Vec<&&str> = tokens.iter().filter(|t| t.chars().any(char::is_alphabetic)).collect();
        let shouting = !cased.is_empty() && cased.iter().all(|t| is_caps(t));
        let valences = Self::token_valences(&tokens, shouting);

        let mut sum: f64 = valences.iter().sum();
        let emphasis = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64 * EXCLAMATION_INCREMENT;
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neutral = 0.0;
        for valence in &valences {
            if *valence > 0.0 {
                pos_sum += valence + 1.0;
            } else if *valence < 0.0 {
                neg_sum += valence - 1.0;
            } else {
                neutral += 1.0;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += emphasis;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= emphasis;
        }

        let total = pos_sum + neg_sum.abs() + neutral;
        let compound = (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0);

        Ok(PolarityScores {
            pos: round_to((pos_sum / total).abs(), 3),
            neg: round_to((neg_sum / total).abs(), 3),
            compound: round_to(compound, 4),
        })
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

fn is_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
        && token.chars().filter(|c| c.is_alphabetic()).count() > 1
}

static CLOSED_CLASS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut tags = HashMap::new();
    let groups: [(&str, &[&str]); 12] = [
        ("DT", &["a", "an", "the", "this", "that", "these", "those", "every", "each", "some", "any", "all", "no"]),
        ("PRP", &["i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "u"]),
        ("PRP$", &["my", "your", "his", "its", "our", "their", "mine", "yours", "ours", "theirs"]),
        ("IN", &["in", "on", "at", "by", "for", "with", "about", "from", "to", "of", "into", "over", "after", "before", "under", "between", "since", "until", "because", "if", "while", "though"]),
        ("CC", &["and", "but", "or", "nor", "so", "yet"]),
        ("MD", &["can", "could", "will", "would", "shall", "should", "may", "might", "must"]),
        ("UH", &["oh", "hey", "hi", "hello", "wow", "lol", "haha", "omg", "ugh", "yay", "hmm", "bye"]),
        ("WP", &["what", "who", "whom", "which", "whose"]),
        ("WRB", &["when", "where", "why", "how"]),
        ("RB", &["not", "never", "always", "very", "too", "also", "just", "now", "then", "here", "there", "soon", "again", "still", "already", "even", "almost", "tomorrow", "today", "tonight", "yesterday"]),
        ("VB", &["be", "have", "do", "go", "get", "make", "know", "think", "want", "see", "come", "take", "say", "tell", "love", "hate", "need", "feel", "look", "work", "call", "try", "ask", "leave", "put", "mean", "keep", "let", "help", "talk", "start", "show", "hear", "play", "run", "move", "live", "believe", "eat", "sleep", "text", "send", "miss", "wait", "stop", "understand", "care", "remember", "forget", "buy", "pay", "watch", "meet"]),
        ("JJ", &["good", "bad", "great", "nice", "happy", "sad", "new", "old", "big", "small", "little", "long", "short", "high", "low", "right", "wrong", "sure", "fine", "cool", "hot", "cold", "late", "early", "busy", "free", "tired", "sorry", "cute", "funny", "stupid", "dumb", "crazy", "weird", "awesome", "amazing", "terrible", "awful", "angry", "mad", "best", "worst", "better", "worse", "real", "true", "hard", "easy", "ready"]),
    ];
    for (tag, words) in groups {
        for word in words {
            tags.entry(*word).or_insert(tag);
        }
    }
    for (word, tag) in [
        ("is", "VBZ"), ("are", "VBP"), ("am", "VBP"), ("was", "VBD"), ("were", "VBD"),
        ("been", "VBN"), ("has", "VBZ"), ("had", "VBD"), ("does", "VBZ"), ("did", "VBD"),
        ("went", "VBD"), ("got", "VBD"), ("made", "VBD"), ("said", "VBD"), ("told", "VBD"),
        ("thought", "VBD"), ("knew", "VBD"), ("saw", "VBD"), ("came", "VBD"), ("took", "VBD"),
        ("felt", "VBD"), ("left", "VBD"), ("gone", "VBN"), ("done", "VBN"), ("seen", "VBN"),
    ] {
        tags.insert(word, tag);
    }
    tags
});

/// Rule-based Penn Treebank tagger: closed-class lookup, then suffix rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTagger;

impl RuleTagger {
    /// Create a tagger over the built-in word lists.
    pub fn new() -> Self {
        Self
    }

    /// Tag a single lowercase token.
    pub fn tag_word(word: &str) -> &'static str {
        if let Some(&tag) = CLOSED_CLASS.get(word) {
            return tag;
        }
        let long = word.chars().count() > 4;
        if long && word.ends_with("ing") {
            "VBG"
        } else if long && word.ends_with("ed") {
            "VBD"
        } else if long && word.ends_with("ly") {
            "RB"
        } else if ["ous", "ful", "ive", "able", "ible", "less", "ish", "ic", "al", "y"]
            .iter()
            .any(|suffix| word.ends_with(suffix) && word.len() > suffix.len() + 2)
        {
            "JJ"
        } else if ["ize", "ise", "ate", "ify"]
            .iter()
            .any(|suffix| word.ends_with(suffix) && word.len() > suffix.len() + 2)
        {
            "VB"
        } else if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
            "NNS"
        } else {
            "NN"
        }
    }
}

impl PosTagger for RuleTagger {
    fn tag(&self, tokens: &[String]) -> AnalysisResult<Vec<(String, String)>> {
        Ok(tokens
            .iter()
            .map(|token| {
                let tag = Self::tag_word(&token.to_lowercase());
                (token.clone(), tag.to_string())
            })
            .collect())
    }

    fn name(&self) -> &str {
        "rule-tagger"
    }
}
