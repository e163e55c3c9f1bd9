//! ClipboardStore - Main API for Swift interop
//!
//! The store ties the pasteboard reader, the duplicate suppressor, the
//! classifier and the SQLite item store together. The host calls
//! `check_pasteboard` on every activation event; the 60 s expiry tick is
//! either host-driven (`reap_expired`) or handled by the background task
//! (`start_auto_reap`).
//!
//! Concurrency model: ingestion and reaping may be triggered from different
//! threads, so every store mutation goes through the single database
//! connection mutex and the last-seen state sits behind its own lock.

use chrono::Utc;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::Database;
use crate::ingest::{is_duplicate, LastSeen};
use crate::interface::{ClipboardItem, ClipnestError, RetentionPolicy};
use crate::models::StoredItem;
use crate::pasteboard::{Pasteboard, PasteboardContent, SystemPasteboard};
use crate::reaper::{self, ReaperTask};

/// Fixed interval for the background expiry sweep
pub const DEFAULT_REAP_INTERVAL_SECS: u64 = 60;

/// Thread-safe clipboard history store
#[derive(uniffi::Object)]
pub struct ClipboardStore {
    db: Arc<Database>,
    pasteboard: Arc<dyn Pasteboard>,
    last_seen: Mutex<LastSeen>,
    policy: RetentionPolicy,
    reaper: Mutex<Option<ReaperTask>>,
}

// Internal implementation (not exported via FFI)
impl ClipboardStore {
    /// Compose a store from its parts. This is the seam for injecting a
    /// platform pasteboard implementation or a test fake.
    pub fn with_pasteboard(
        db: Database,
        pasteboard: Arc<dyn Pasteboard>,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            db: Arc::new(db),
            pasteboard,
            last_seen: Mutex::new(LastSeen::default()),
            policy,
            reaper: Mutex::new(None),
        }
    }

    /// Run a payload through the ingestion pipeline: duplicate check,
    /// classification, insert, last-seen update.
    ///
    /// Returns the new item, or `None` when the payload was empty or a
    /// duplicate of the last ingested one. A failed insert leaves the
    /// last-seen state untouched so the next trigger retries from scratch.
    fn ingest(&self, content: PasteboardContent) -> Result<Option<ClipboardItem>, ClipnestError> {
        if content.is_empty() {
            return Ok(None);
        }

        if is_duplicate(&content, &self.last_seen.lock()) {
            debug!("pasteboard content matches last ingested item, skipping");
            return Ok(None);
        }

        let expires_at = self
            .policy
            .default_ttl_seconds
            .map(|ttl| Utc::now() + chrono::Duration::seconds(ttl as i64));

        let item = StoredItem::from_payload(
            content.text.clone(),
            content.image_data.clone(),
            expires_at,
            self.policy.source_device.clone(),
        );

        self.db.insert_item(&item).map_err(|e| {
            warn!(%e, "abandoning ingestion cycle");
            ClipnestError::write(e)
        })?;
        self.last_seen.lock().remember(&content);

        debug!(id = %item.id, content_type = ?item.content_type, "ingested clipboard item");
        Ok(Some(item.to_interface()))
    }

    fn parse_id(id: &str) -> Result<Uuid, ClipnestError> {
        Uuid::parse_str(id).map_err(|_| ClipnestError::InvalidInput {
            reason: format!("not a valid item id: {id}"),
        })
    }
}

// FFI-exported constructor (must be in standalone impl block)
#[uniffi::export]
impl ClipboardStore {
    /// Create a store with a database at the given path, reading the
    /// system pasteboard.
    #[uniffi::constructor]
    pub fn new(db_path: String, policy: RetentionPolicy) -> Result<Self, ClipnestError> {
        let db = Database::open(PathBuf::from(db_path)).map_err(ClipnestError::read)?;
        let pasteboard = Arc::new(SystemPasteboard::new()?);
        Ok(Self::with_pasteboard(db, pasteboard, policy))
    }
}

#[uniffi::export]
impl ClipboardStore {
    /// Activation trigger: read the pasteboard and ingest whatever is there.
    /// Returns the newly created item, or `None` when nothing was ingested.
    pub fn check_pasteboard(&self) -> Result<Option<ClipboardItem>, ClipnestError> {
        match self.pasteboard.read() {
            Some(content) => self.ingest(content),
            None => Ok(None),
        }
    }

    /// Ingest a payload the host read from the pasteboard itself
    /// (the iOS path, where `UIPasteboard` is only reachable from Swift).
    pub fn ingest_snapshot(
        &self,
        text: Option<String>,
        image_data: Option<Vec<u8>>,
    ) -> Result<Option<ClipboardItem>, ClipnestError> {
        self.ingest(PasteboardContent { text, image_data })
    }

    /// Fetch the most recent items, newest first
    pub fn recent_items(&self, limit: u32) -> Result<Vec<ClipboardItem>, ClipnestError> {
        let items = self
            .db
            .fetch_recent(limit as usize)
            .map_err(ClipnestError::read)?;
        Ok(items.iter().map(StoredItem::to_interface).collect())
    }

    /// Fetch a single item by id
    pub fn get_item(&self, id: String) -> Result<Option<ClipboardItem>, ClipnestError> {
        let id = Self::parse_id(&id)?;
        let item = self.db.fetch_item(&id).map_err(ClipnestError::read)?;
        Ok(item.map(|i| i.to_interface()))
    }

    /// Toggle the pin flag on an item. Pinned items are exempt from expiry.
    pub fn set_pinned(&self, id: String, pinned: bool) -> Result<(), ClipnestError> {
        let id = Self::parse_id(&id)?;
        self.db
            .set_pinned(&id, pinned)
            .map_err(ClipnestError::write)?;
        Ok(())
    }

    /// Delete an item by id
    pub fn delete_item(&self, id: String) -> Result<(), ClipnestError> {
        let id = Self::parse_id(&id)?;
        self.db.delete_item(&id).map_err(ClipnestError::write)
    }

    /// Delete all items
    pub fn clear_all(&self) -> Result<(), ClipnestError> {
        self.db.clear_all().map_err(ClipnestError::write)
    }

    /// Number of stored items
    pub fn count_items(&self) -> Result<u64, ClipnestError> {
        self.db.count_items().map_err(ClipnestError::read)
    }

    /// Get the database size in bytes
    pub fn database_size(&self) -> i64 {
        self.db.database_size().unwrap_or(0)
    }

    /// Delete all unpinned items whose expiry has passed. Returns the count.
    pub fn reap_expired(&self) -> Result<u64, ClipnestError> {
        reaper::sweep(&self.db, Utc::now())
    }

    /// Start the background expiry sweep on the standard 60 s interval
    pub fn start_auto_reap(&self) {
        self.start_auto_reap_every(DEFAULT_REAP_INTERVAL_SECS);
    }

    /// Start the background expiry sweep on a custom interval.
    /// Replaces any previously running sweep task.
    pub fn start_auto_reap_every(&self, interval_seconds: u64) {
        let task = ReaperTask::spawn(
            self.db.clone(),
            Duration::from_secs(interval_seconds.max(1)),
        );
        *self.reaper.lock() = Some(task);
    }

    /// Stop the background expiry sweep, if running
    pub fn stop_auto_reap(&self) {
        if let Some(task) = self.reaper.lock().take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::SmartContentType;

    /// Scripted pasteboard for driving the ingestion pipeline in tests
    struct FakePasteboard {
        content: Mutex<Option<PasteboardContent>>,
    }

    impl FakePasteboard {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                content: Mutex::new(None),
            })
        }

        fn set(&self, content: PasteboardContent) {
            *self.content.lock() = Some(content);
        }
    }

    impl Pasteboard for FakePasteboard {
        fn read(&self) -> Option<PasteboardContent> {
            self.content.lock().clone()
        }
    }

    fn make_store(policy: RetentionPolicy) -> (ClipboardStore, Arc<FakePasteboard>) {
        let pasteboard = FakePasteboard::new();
        let db = Database::open_in_memory().unwrap();
        let store = ClipboardStore::with_pasteboard(db, pasteboard.clone(), policy);
        (store, pasteboard)
    }

    #[test]
    fn test_empty_pasteboard_is_noop() {
        let (store, _pasteboard) = make_store(RetentionPolicy::default());
        assert!(store.check_pasteboard().unwrap().is_none());
        assert_eq!(store.count_items().unwrap(), 0);
    }

    #[test]
    fn test_ingest_classifies_and_stores() {
        let (store, pasteboard) = make_store(RetentionPolicy::default());
        pasteboard.set(PasteboardContent::text("https://example.com"));

        let item = store.check_pasteboard().unwrap().unwrap();
        assert_eq!(item.content_type, SmartContentType::Url);
        assert_eq!(item.content.as_deref(), Some("https://example.com"));
        assert!(item.expires_at_unix.is_none());
        assert_eq!(store.count_items().unwrap(), 1);
    }

    #[test]
    fn test_policy_applies_ttl_and_device() {
        let policy = RetentionPolicy {
            default_ttl_seconds: Some(3600),
            source_device: Some("MacBook Air".to_string()),
        };
        let (store, pasteboard) = make_store(policy);
        pasteboard.set(PasteboardContent::text("hello"));

        let before = Utc::now().timestamp();
        let item = store.check_pasteboard().unwrap().unwrap();
        let expires = item.expires_at_unix.unwrap();
        assert!(expires >= before + 3600 && expires <= before + 3610);
        assert_eq!(item.source_device.as_deref(), Some("MacBook Air"));
    }

    #[test]
    fn test_duplicate_activation_is_suppressed() {
        let (store, pasteboard) = make_store(RetentionPolicy::default());
        pasteboard.set(PasteboardContent::text("copy once"));

        assert!(store.check_pasteboard().unwrap().is_some());
        assert!(store.check_pasteboard().unwrap().is_none());
        assert_eq!(store.count_items().unwrap(), 1);
    }

    #[test]
    fn test_ingest_snapshot_host_path() {
        let (store, _pasteboard) = make_store(RetentionPolicy::default());
        let item = store
            .ingest_snapshot(Some("010-1234-5678".to_string()), None)
            .unwrap()
            .unwrap();
        assert_eq!(item.content_type, SmartContentType::PhoneNumber);

        // Host path and reader path share the same last-seen state
        assert!(store
            .ingest_snapshot(Some("010-1234-5678".to_string()), None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let (store, _pasteboard) = make_store(RetentionPolicy::default());
        assert!(matches!(
            store.set_pinned("not-a-uuid".to_string(), true),
            Err(ClipnestError::InvalidInput { .. })
        ));
        assert!(matches!(
            store.delete_item("not-a-uuid".to_string()),
            Err(ClipnestError::InvalidInput { .. })
        ));
    }
}
