use super::{ChatParser, ParseError};
use chatlens_core::constants::{DELETED_MESSAGE_MARKER, MAX_IMPORT_FILE_SIZE, SYSTEM_NOTICE_PREFIX};
use chatlens_core::{Message, Transcript};
use chrono::{NaiveDateTime, ParseResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// `M/D/YY, H:MM[:SS] AM - Author: body`; `\s` also covers the no-break
/// space variants the exporter puts before the meridiem.
static HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}/\d{1,2}/\d{2}), (\d{1,2}:\d{2}(?::\d{2})?)\s*([AP]M) - (.*?): (.*)$")
        .expect("header pattern")
});

/// Counters describing one parse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Messages produced.
    pub accepted: usize,
    /// Lines folded into a previous message.
    pub continuation_lines: usize,
    /// Non-header lines seen before any message, dropped.
    pub orphan_lines: usize,
    /// Encryption/call banners dropped.
    pub system_notices: usize,
    /// `<...>` media placeholders dropped.
    pub media_placeholders: usize,
    /// Deleted-message stubs dropped.
    pub deleted_messages: usize,
}

impl ParseSummary {
    /// Header lines that were discarded by a filter.
    pub fn filtered(&self) -> usize {
        self.system_notices + self.media_placeholders + self.deleted_messages
    }
}

/// Parser for WhatsApp plain-text chat exports.
pub struct WhatsAppParser {
    name_str: String,
}

struct PendingMessage {
    timestamp: NaiveDateTime,
    author: String,
    text: String,
}

impl PendingMessage {
    fn finish(self) -> Message {
        Message::new(self.timestamp, self.author, self.text)
    }
}

enum Filtered {
    SystemNotice,
    MediaPlaceholder,
    Deleted,
}

impl WhatsAppParser {
    /// Creates a new WhatsAppParser instance.
    pub fn new() -> Self {
        Self {
            name_str: "whatsapp".to_string(),
        }
    }

    /// Parse an in-memory transcript.
    pub fn parse_str(&self, content: &str) -> Result<Transcript, ParseError> {
        self.parse_lines(content.lines())
    }

    /// Parse transcript lines in file order.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<Transcript, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_with_summary(lines.into_iter().map(Ok))
            .map(|(transcript, _)| transcript)
    }

    /// Parse lines, returning the transcript and what was folded or dropped.
    ///
    /// A header-shaped line whose timestamp does not parse aborts the run;
    /// lines without header shape are continuations and never fail.
    pub fn parse_with_summary<I, S>(&self, lines: I) -> Result<(Transcript, ParseSummary), ParseError>
    where
        I: IntoIterator<Item = Result<S, std::io::Error>>,
        S: AsRef<str>,
    {
        let mut messages = Vec::new();
        let mut pending: Option<PendingMessage> = None;
        let mut summary = ParseSummary::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line?;
            let line = line.as_ref();

            let Some(caps) = HEADER_PATTERN.captures(line) else {
                match pending.as_mut() {
                    Some(message) => {
                        message.text.push('\n');
                        message.text.push_str(line);
                        summary.continuation_lines += 1;
                    }
                    None => summary.orphan_lines += 1,
                }
                continue;
            };

            let author = &caps[4];
            let body = &caps[5];

            if let Some(reason) = filter_reason(author, body) {
                match reason {
                    Filtered::SystemNotice => summary.system_notices += 1,
                    Filtered::MediaPlaceholder => summary.media_placeholders += 1,
                    Filtered::Deleted => summary.deleted_messages += 1,
                }
                continue;
            }

            let timestamp = parse_timestamp(&caps[1], &caps[2], &caps[3]).map_err(|e| {
                ParseError::MalformedTimestamp {
                    line_number: index + 1,
                    line: line.to_string(),
                    reason: e.to_string(),
                }
            })?;

            if let Some(done) = pending.take() {
                messages.push(done.finish());
            }
            pending = Some(PendingMessage {
                timestamp,
                author: author.to_string(),
                text: body.to_string(),
            });
            summary.accepted += 1;
        }

        if let Some(done) = pending.take() {
            messages.push(done.finish());
        }

        debug!(
            "Filtered {} system notices, {} media placeholders, {} deleted messages",
            summary.system_notices, summary.media_placeholders, summary.deleted_messages
        );
        info!(
            "Parsed {} messages ({} continuation lines, {} filtered)",
            summary.accepted,
            summary.continuation_lines,
            summary.filtered()
        );

        Ok((Transcript::new(messages), summary))
    }
}

impl Default for WhatsAppParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatParser for WhatsAppParser {
    fn name(&self) -> &str {
        &self.name_str
    }

    fn can_parse(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.contains("whatsapp") || path_str.ends_with(".txt")
    }

    fn parse(&self, path: &Path) -> Result<Transcript, ParseError> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_IMPORT_FILE_SIZE {
            return Err(ParseError::FileTooLarge {
                size,
                limit: MAX_IMPORT_FILE_SIZE,
            });
        }

        let reader = BufReader::new(File::open(path)?);
        self.parse_with_summary(reader.lines())
            .map(|(transcript, _)| transcript)
    }
}

fn filter_reason(author: &str, body: &str) -> Option<Filtered> {
    if author.starts_with(SYSTEM_NOTICE_PREFIX) {
        Some(Filtered::SystemNotice)
    } else if body.starts_with('<') && body.ends_with('>') {
        Some(Filtered::MediaPlaceholder)
    } else if body.contains(DELETED_MESSAGE_MARKER) {
        Some(Filtered::Deleted)
    } else {
        None
    }
}

/// The pattern already split the meridiem from the clock, dropping whatever
/// space variant sat between them.
fn parse_timestamp(date: &str, clock: &str, meridiem: &str) -> ParseResult<NaiveDateTime> {
    let normalized = format!("{} {} {}", date, clock, meridiem);
    if clock.matches(':').count() == 2 {
        NaiveDateTime::parse_from_str(&normalized, "%m/%d/%y %I:%M:%S %p")
    } else {
        NaiveDateTime::parse_from_str(&normalized, "%m/%d/%y %I:%M %p")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn header_line_round_trips_author_and_text() {
        let parser = WhatsAppParser::new();
        let transcript = parser
            .parse_str("1/15/23, 9:05 PM - Ana María: see you at 8: sharp")
            .unwrap();

        let message = &transcript.messages()[0];
        assert_eq!(message.author(), "Ana María");
        assert_eq!(message.text(), "see you at 8: sharp");
        assert_eq!(message.timestamp(), at(2023, 1, 15, 21, 5, 0));
    }

    #[test]
    fn narrow_no_break_space_before_meridiem() {
        let parser = WhatsAppParser::new();
        let transcript = parser
            .parse_str("12/3/22, 12:30\u{202f}AM - Sam: late night")
            .unwrap();

        assert_eq!(transcript.messages()[0].timestamp(), at(2022, 12, 3, 0, 30, 0));
    }

    #[test]
    fn optional_seconds_are_parsed() {
        let parser = WhatsAppParser::new();
        let transcript = parser.parse_str("3/4/24, 7:08:09 AM - Sam: hi").unwrap();
        assert_eq!(transcript.messages()[0].timestamp(), at(2024, 3, 4, 7, 8, 9));
    }

    #[test]
    fn continuation_lines_are_folded_verbatim() {
        let parser = WhatsAppParser::new();
        let input = "1/1/23, 9:00 AM - Sam: first line\n  indented second  \n\n1/1/23, 9:01 AM - Kim: reply";
        let (transcript, summary) = parser
            .parse_with_summary(input.lines().map(Ok))
            .unwrap();

        assert_eq!(transcript.len(), 2);
        assert_eq!(
            transcript.messages()[0].text(),
            "first line\n  indented second  \n"
        );
        assert_eq!(summary.continuation_lines, 2);
    }

    #[test]
    fn leading_continuation_lines_are_dropped() {
        let parser = WhatsAppParser::new();
        let (transcript, summary) = parser
            .parse_with_summary(
                ["exported chat", "1/1/23, 9:00 AM - Sam: hello"]
                    .into_iter()
                    .map(Ok),
            )
            .unwrap();

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].text(), "hello");
        assert_eq!(summary.orphan_lines, 1);
    }

    #[test]
    fn filters_drop_banner_media_and_deleted() {
        let parser = WhatsAppParser::new();
        let input = [
            "1/1/23, 8:59 AM - Messages and calls are end-to-end encrypted. Tap to learn more.: x",
            "1/1/23, 9:00 AM - Sam: hello",
            "1/1/23, 9:01 AM - Kim: <Media omitted>",
            "still part of hello",
            "1/1/23, 9:02 AM - Kim: This message was deleted",
            "1/1/23, 9:03 AM - Kim: ok",
        ];
        let (transcript, summary) = parser
            .parse_with_summary(input.into_iter().map(Ok))
            .unwrap();

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].text(), "hello\nstill part of hello");
        assert_eq!(transcript.messages()[1].text(), "ok");
        assert_eq!(summary.system_notices, 1);
        assert_eq!(summary.media_placeholders, 1);
        assert_eq!(summary.deleted_messages, 1);
        assert_eq!(summary.filtered(), 3);
    }

    #[test]
    fn malformed_header_timestamp_is_fatal() {
        let parser = WhatsAppParser::new();
        let err = parser
            .parse_str("1/1/23, 9:00 AM - Sam: ok\n13/45/23, 9:00 AM - Sam: bad date")
            .unwrap_err();

        match err {
            ParseError::MalformedTimestamp { line_number, .. } => assert_eq!(line_number, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn hour_outside_twelve_hour_clock_is_fatal() {
        let parser = WhatsAppParser::new();
        assert!(parser.parse_str("1/1/23, 14:00 PM - Sam: hi").is_err());
    }

    #[test]
    fn file_order_is_preserved() {
        let parser = WhatsAppParser::new();
        let transcript = parser
            .parse_str("1/2/23, 9:00 AM - Sam: later\n1/1/23, 9:00 AM - Kim: earlier")
            .unwrap();

        assert_eq!(transcript.messages()[0].text(), "later");
        assert_eq!(transcript.messages()[1].text(), "earlier");
    }

    #[test]
    fn parse_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.txt");
        std::fs::write(&path, "1/1/23, 9:00 AM - Sam: hello\r\nthere\r\n").unwrap();

        let parser = WhatsAppParser::new();
        assert!(parser.can_parse(&path));
        let transcript = parser.parse(&path).unwrap();
        assert_eq!(transcript.messages()[0].text(), "hello\nthere");
    }
}
