//! Application constants and analysis defaults.

/// Seconds in one calendar day, used for every "(days)" metric.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Author-field prefix of the encryption banner the exporter writes as a message.
pub const SYSTEM_NOTICE_PREFIX: &str = "Messages and calls are";

/// Body phrase the exporter leaves behind for deleted messages.
pub const DELETED_MESSAGE_MARKER: &str = "message was deleted";

/// Silences longer than this multiple of the global median gap count as exits.
pub const EXIT_GAP_MULTIPLIER: f64 = 3.0;

/// Default number of words kept per part-of-speech bucket.
pub const DEFAULT_POS_TOP_K: usize = 10;

/// Default number of words shown from an author's frequency table.
pub const DEFAULT_REPORT_TOP_WORDS: usize = 10;

/// Minimum accumulated negative attribution for a word to be reported.
pub const DEFAULT_BAD_WORD_THRESHOLD: f64 = 0.5;

/// Default number of "words not to say" shown per author.
pub const DEFAULT_REPORT_BAD_WORDS: usize = 15;

/// Maximum transcript size accepted for import (100 MB).
pub const MAX_IMPORT_FILE_SIZE: u64 = 100 * 1024 * 1024;
