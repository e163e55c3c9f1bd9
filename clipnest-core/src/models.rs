//! Core data model for clipboard history items
//!
//! `StoredItem` is the internal representation used for storage; the host UI
//! sees the flattened `ClipboardItem` record from `interface`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::content_detection::classify;
use crate::interface::{ClipboardItem, SmartContentType};

/// Internal clipboard item representation for database storage
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    /// Assigned at construction, never reassigned
    pub id: Uuid,
    pub content: Option<String>,
    pub image_data: Option<Vec<u8>>,
    pub content_type: SmartContentType,
    pub created_at: DateTime<Utc>,
    /// `None` means the item never auto-expires
    pub expires_at: Option<DateTime<Utc>>,
    pub is_pinned: bool,
    pub source_device: Option<String>,
}

impl StoredItem {
    /// Create an item from a raw pasteboard payload.
    ///
    /// Text payloads are classified; an image-only payload carries `Plain`.
    pub fn from_payload(
        text: Option<String>,
        image_data: Option<Vec<u8>>,
        expires_at: Option<DateTime<Utc>>,
        source_device: Option<String>,
    ) -> Self {
        let content_type = text
            .as_deref()
            .map(classify)
            .unwrap_or(SmartContentType::Plain);
        Self {
            id: Uuid::new_v4(),
            content: text,
            image_data,
            content_type,
            created_at: Utc::now(),
            expires_at,
            is_pinned: false,
            source_device,
        }
    }

    /// Create a text item (auto-classified)
    pub fn new_text(text: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self::from_payload(Some(text), None, expires_at, None)
    }

    /// Create an image item
    pub fn new_image(image_data: Vec<u8>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self::from_payload(None, Some(image_data), expires_at, None)
    }

    /// Convert to the FFI record for the host UI
    pub fn to_interface(&self) -> ClipboardItem {
        ClipboardItem {
            id: self.id.to_string(),
            content: self.content.clone(),
            image_data: self.image_data.clone(),
            content_type: self.content_type,
            created_at_unix: self.created_at.timestamp(),
            expires_at_unix: self.expires_at.map(|t| t.timestamp()),
            is_pinned: self.is_pinned,
            source_device: self.source_device.clone(),
        }
    }
}
