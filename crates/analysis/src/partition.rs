use chatlens_core::Message;
use std::collections::BTreeMap;

/// The two orderings every timing metric is computed over, built once.
///
/// `global` is all messages stably sorted by timestamp; each author order is
/// that author's subsequence of the global order, so ties keep file order in
/// both.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    global: Vec<&'a Message>,
    by_author: BTreeMap<&'a str, Vec<&'a Message>>,
}

impl<'a> Partition<'a> {
    /// Sort and group `messages`; the input slice is left untouched.
    pub fn new(messages: &'a [Message]) -> Self {
        let mut global: Vec<&Message> = messages.iter().collect();
        global.sort_by_key(|message| message.timestamp());

        let mut by_author: BTreeMap<&str, Vec<&Message>> = BTreeMap::new();
        for message in &global {
            by_author.entry(message.author()).or_default().push(*message);
        }

        Self { global, by_author }
    }

    /// All messages in chronological order.
    pub fn global(&self) -> &[&'a Message] {
        &self.global
    }

    /// One author's messages in chronological order.
    pub fn author_order(&self, author: &str) -> Option<&[&'a Message]> {
        self.by_author.get(author).map(Vec::as_slice)
    }

    /// Authors and their chronological messages, sorted by author name.
    pub fn authors(&self) -> impl Iterator<Item = (&'a str, &[&'a Message])> + '_ {
        self.by_author
            .iter()
            .map(|(author, messages)| (*author, messages.as_slice()))
    }

    /// Number of distinct authors.
    pub fn author_count(&self) -> usize {
        self.by_author.len()
    }

    /// Whether there are no messages at all.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }
}
