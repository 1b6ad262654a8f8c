use chatlens_core::{DailyActivityTable, Message};
use std::collections::BTreeMap;

/// Messages per author per calendar day.
///
/// Days without messages are not synthesized; see
/// [`DailyActivityTable::continuous`] for a gap-filled series.
pub fn daily_activity(messages: &[Message]) -> BTreeMap<String, DailyActivityTable> {
    messages
        .iter()
        .fold(BTreeMap::new(), |mut by_author, message| {
            by_author
                .entry(message.author().to_string())
                .or_insert_with(DailyActivityTable::default)
                .record(message.day());
            by_author
        })
}
