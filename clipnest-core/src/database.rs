//! SQLite item store for clipboard history
//!
//! Single-writer wrapper around a `rusqlite` connection. The ingestion
//! pipeline and the expiry reaper both mutate the store through this type, so
//! every operation takes the connection mutex for its full duration.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::interface::SmartContentType;
use crate::models::StoredItem;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Convert a unix timestamp column value to `DateTime<Utc>`
fn from_unix(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_else(Utc::now)
}

/// Thread-safe database wrapper
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        let conn = Connection::open(path)?;

        // WAL mode + mmap for faster reads
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA mmap_size=67108864;
            PRAGMA cache_size=-32000;
        ",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.setup_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.setup_schema()?;
        Ok(db)
    }

    /// Set up the database schema
    fn setup_schema(&self) -> DatabaseResult<()> {
        let conn = self.conn.lock();

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                content TEXT,
                image_data BLOB,
                content_type TEXT NOT NULL DEFAULT 'plain',
                created_at INTEGER NOT NULL,
                expires_at INTEGER,
                is_pinned INTEGER NOT NULL DEFAULT 0,
                source_device TEXT
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_items_created_at ON items(created_at)",
            [],
        )?;
        // Covers the reaper's candidate query
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_items_expiry ON items(is_pinned, expires_at)",
            [],
        )?;

        Ok(())
    }

    /// Get the database size in bytes
    pub fn database_size(&self) -> DatabaseResult<i64> {
        let conn = self.conn.lock();
        let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
        let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
        Ok(page_count * page_size)
    }

    /// Insert a new clipboard item
    pub fn insert_item(&self, item: &StoredItem) -> DatabaseResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            r#"
            INSERT INTO items (id, content, image_data, content_type, created_at, expires_at, is_pinned, source_device)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                item.id.to_string(),
                item.content,
                item.image_data,
                item.content_type.database_type(),
                item.created_at.timestamp(),
                item.expires_at.map(|t| t.timestamp()),
                item.is_pinned,
                item.source_device,
            ],
        )?;
        Ok(())
    }

    /// Fetch a single item by id
    pub fn fetch_item(&self, id: &Uuid) -> DatabaseResult<Option<StoredItem>> {
        let conn = self.conn.lock();
        let item = conn
            .query_row(
                "SELECT id, content, image_data, content_type, created_at, expires_at, is_pinned, source_device
                 FROM items WHERE id = ?1",
                [id.to_string()],
                Self::row_to_stored_item,
            )
            .optional()?;
        Ok(item)
    }

    /// Fetch the most recent items, newest first
    pub fn fetch_recent(&self, limit: usize) -> DatabaseResult<Vec<StoredItem>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, content, image_data, content_type, created_at, expires_at, is_pinned, source_device
             FROM items ORDER BY created_at DESC, rowid DESC LIMIT ?1",
        )?;
        let items = stmt
            .query_map([limit as i64], Self::row_to_stored_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Count all items
    pub fn count_items(&self) -> DatabaseResult<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Set the pin flag on an item. Returns false if the item does not exist.
    pub fn set_pinned(&self, id: &Uuid, pinned: bool) -> DatabaseResult<bool> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE items SET is_pinned = ?1 WHERE id = ?2",
            params![pinned, id.to_string()],
        )?;
        Ok(changed > 0)
    }

    /// Delete an item by id
    pub fn delete_item(&self, id: &Uuid) -> DatabaseResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM items WHERE id = ?1", [id.to_string()])?;
        Ok(())
    }

    /// Delete a set of items in one transaction. Returns the number deleted.
    pub fn delete_items(&self, ids: &[Uuid]) -> DatabaseResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut deleted = 0;
        for id in ids {
            deleted += tx.execute("DELETE FROM items WHERE id = ?1", [id.to_string()])?;
        }
        tx.commit()?;
        Ok(deleted)
    }

    /// Delete all items
    pub fn clear_all(&self) -> DatabaseResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM items", [])?;
        Ok(())
    }

    /// Fetch reaper candidates: unpinned items that have an expiry set.
    ///
    /// The `expires_at <= now` comparison happens in memory at the call site;
    /// pinned items never appear here regardless of their expiry.
    pub fn expiry_candidates(&self) -> DatabaseResult<Vec<(Uuid, DateTime<Utc>)>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, expires_at FROM items WHERE is_pinned = 0 AND expires_at IS NOT NULL",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let expires_at: i64 = row.get(1)?;
                Ok((id, expires_at))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, expires_at)| {
                Uuid::parse_str(&id).ok().map(|id| (id, from_unix(expires_at)))
            })
            .collect())
    }

    /// Convert a database row to a StoredItem
    fn row_to_stored_item(row: &rusqlite::Row) -> rusqlite::Result<StoredItem> {
        let id: String = row.get(0)?;
        let id = Uuid::parse_str(&id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let content: Option<String> = row.get(1)?;
        let image_data: Option<Vec<u8>> = row.get(2)?;
        let content_type: String = row.get(3)?;
        let created_at: i64 = row.get(4)?;
        let expires_at: Option<i64> = row.get(5)?;
        let is_pinned: bool = row.get(6)?;
        let source_device: Option<String> = row.get(7)?;

        Ok(StoredItem {
            id,
            content,
            image_data,
            content_type: SmartContentType::from_database(&content_type),
            created_at: from_unix(created_at),
            expires_at: expires_at.map(from_unix),
            is_pinned,
            source_device,
        })
    }
}
