//! Duplicate suppression for the ingestion pipeline
//!
//! The last-seen state is owned by the orchestrator and injected into the
//! check, so the comparison never touches the store: a one-deep lookback
//! against the most recently ingested payload replaces a fetch-and-compare
//! on every pasteboard read. Copying A, then B, then A again re-inserts A.

use crate::pasteboard::PasteboardContent;

/// The most recently ingested payload. Initialized empty at startup,
/// updated after every successful insert, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastSeen {
    pub text: Option<String>,
    pub image: Option<Vec<u8>>,
}

impl LastSeen {
    /// Record a payload as the most recently ingested one
    pub fn remember(&mut self, content: &PasteboardContent) {
        self.text = content.text.clone();
        self.image = content.image_data.clone();
    }
}

/// True when the candidate payload matches the last ingested one.
///
/// Duplicate iff the candidate text is present and equals the last-seen text,
/// or the candidate image is present and byte-equal to the last-seen image.
pub fn is_duplicate(candidate: &PasteboardContent, last_seen: &LastSeen) -> bool {
    let text_match = match (&candidate.text, &last_seen.text) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };
    let image_match = match (&candidate.image_data, &last_seen.image) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };
    text_match || image_match
}
