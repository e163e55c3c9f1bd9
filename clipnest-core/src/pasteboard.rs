//! Pasteboard access
//!
//! The reader only extracts raw payload; classification happens later in the
//! ingestion pipeline. Implementations are selected at composition time: the
//! desktop build injects [`SystemPasteboard`], while hosts that read the
//! pasteboard themselves (e.g. `UIPasteboard` on iOS) bypass the trait and
//! submit payloads through `ClipboardStore::ingest_snapshot`.

use parking_lot::Mutex;
use tracing::debug;

use crate::interface::ClipnestError;

/// A raw snapshot of the pasteboard: text and/or image bytes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PasteboardContent {
    pub text: Option<String>,
    pub image_data: Option<Vec<u8>>,
}

impl PasteboardContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image_data: None,
        }
    }

    pub fn image(image_data: Vec<u8>) -> Self {
        Self {
            text: None,
            image_data: Some(image_data),
        }
    }

    /// True when there is nothing to ingest
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty) && self.image_data.is_none()
    }
}

/// Read-only access to the platform's general pasteboard
pub trait Pasteboard: Send + Sync {
    /// Read the current pasteboard content.
    ///
    /// Text is preferred over image when both are present; `None` means the
    /// pasteboard is empty or holds no recognized type.
    fn read(&self) -> Option<PasteboardContent>;
}

/// Desktop pasteboard implementation backed by `arboard`
pub struct SystemPasteboard {
    inner: Mutex<arboard::Clipboard>,
}

impl SystemPasteboard {
    pub fn new() -> Result<Self, ClipnestError> {
        let clipboard =
            arboard::Clipboard::new().map_err(|e| ClipnestError::PasteboardUnavailable {
                reason: e.to_string(),
            })?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }
}

impl Pasteboard for SystemPasteboard {
    fn read(&self) -> Option<PasteboardContent> {
        let mut clipboard = self.inner.lock();

        if let Ok(text) = clipboard.get_text() {
            if !text.is_empty() {
                debug!(chars = text.chars().count(), "captured pasteboard text");
                return Some(PasteboardContent::text(text));
            }
        }

        if let Ok(image) = clipboard.get_image() {
            if let Some(png) = encode_png(&image) {
                debug!(bytes = png.len(), "captured pasteboard image");
                return Some(PasteboardContent::image(png));
            }
        }

        None
    }
}

/// Encode a raw RGBA capture as PNG for storage.
/// Returns None if the dimensions do not match the buffer.
fn encode_png(image: &arboard::ImageData) -> Option<Vec<u8>> {
    let buffer = image::RgbaImage::from_raw(
        image.width as u32,
        image.height as u32,
        image.bytes.clone().into_owned(),
    )?;

    let mut out = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut out);
    image::DynamicImage::ImageRgba8(buffer)
        .write_to(&mut cursor, image::ImageFormat::Png)
        .ok()?;
    Some(out)
}
