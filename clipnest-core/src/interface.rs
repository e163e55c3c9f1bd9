//! Clipnest FFI Interface Definition
//!
//! This file defines the public interface exposed to Swift via UniFFI.
//! It acts as the source of truth for shared types.

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Smart classification of a text payload.
///
/// Image presence is a property of the payload (`image_data`), not a category:
/// an image-bearing item still carries a `SmartContentType` for whatever text
/// accompanied it (or `Plain` when there was none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum SmartContentType {
    Plain,
    Url,
    Email,
    PhoneNumber,
}

impl SmartContentType {
    /// Stable string form used in the database `content_type` column
    pub fn database_type(&self) -> &'static str {
        match self {
            SmartContentType::Plain => "plain",
            SmartContentType::Url => "url",
            SmartContentType::Email => "email",
            SmartContentType::PhoneNumber => "phone",
        }
    }

    /// Parse the database string form. Unknown values fall back to `Plain`.
    pub fn from_database(s: &str) -> Self {
        match s {
            "url" => SmartContentType::Url,
            "email" => SmartContentType::Email,
            "phone" => SmartContentType::PhoneNumber,
            _ => SmartContentType::Plain,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A clipboard history item as seen by the host UI
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct ClipboardItem {
    /// UUID string, assigned at creation and never reassigned
    pub id: String,
    pub content: Option<String>,
    pub image_data: Option<Vec<u8>>,
    pub content_type: SmartContentType,
    pub created_at_unix: i64,
    /// Absent means the item never auto-expires
    pub expires_at_unix: Option<i64>,
    pub is_pinned: bool,
    pub source_device: Option<String>,
}

/// Retention settings applied by the ingestion pipeline to new items
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct RetentionPolicy {
    /// Lifetime granted to newly ingested items; `None` keeps them forever
    pub default_ttl_seconds: Option<u64>,
    /// Label recorded as the originating device on new items
    pub source_device: Option<String>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            default_ttl_seconds: None,
            source_device: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR TYPE
// ═══════════════════════════════════════════════════════════════════════════════

/// Error type for Clipnest operations.
///
/// Store failures are recoverable-by-abandonment: the current ingestion or
/// sweep is dropped and the next trigger starts fresh. Classification has no
/// error case at all.
#[derive(Debug, Error, uniffi::Error)]
pub enum ClipnestError {
    #[error("store read failed: {reason}")]
    StoreRead { reason: String },
    #[error("store write failed: {reason}")]
    StoreWrite { reason: String },
    #[error("pasteboard unavailable: {reason}")]
    PasteboardUnavailable { reason: String },
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl ClipnestError {
    pub(crate) fn read(e: impl std::fmt::Display) -> Self {
        ClipnestError::StoreRead {
            reason: e.to_string(),
        }
    }

    pub(crate) fn write(e: impl std::fmt::Display) -> Self {
        ClipnestError::StoreWrite {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_type_roundtrip() {
        for ty in [
            SmartContentType::Plain,
            SmartContentType::Url,
            SmartContentType::Email,
            SmartContentType::PhoneNumber,
        ] {
            assert_eq!(SmartContentType::from_database(ty.database_type()), ty);
        }
    }

    #[test]
    fn test_unknown_database_type_falls_back_to_plain() {
        assert_eq!(
            SmartContentType::from_database("otp"),
            SmartContentType::Plain
        );
    }
}
