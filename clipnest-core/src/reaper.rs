//! Expiry reaper
//!
//! Deletes unpinned items whose expiry timestamp has passed. The sweep runs
//! either from a host-driven tick (`ClipboardStore::reap_expired`) or from the
//! background interval task spawned by `start_auto_reap`.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::database::Database;
use crate::interface::ClipnestError;

/// Global fallback Tokio runtime for when the reaper is started outside any
/// runtime context. Shared across all ClipboardStore instances and never
/// dropped. Used by UniFFI which doesn't provide a tokio runtime.
static FALLBACK_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create fallback tokio runtime")
});

/// Get a tokio runtime handle - current runtime if available, otherwise the
/// global fallback
fn runtime_handle() -> tokio::runtime::Handle {
    tokio::runtime::Handle::try_current().unwrap_or_else(|_| FALLBACK_RUNTIME.handle().clone())
}

/// Delete all unpinned items whose expiry has passed. Returns the count.
///
/// Two-stage selection: the store predicate narrows to unpinned items with an
/// expiry set, the timestamp comparison against `now` happens in memory, and
/// the selected rows are deleted in one transaction. Zero matches is a no-op.
pub fn sweep(db: &Database, now: DateTime<Utc>) -> Result<u64, ClipnestError> {
    let candidates = db.expiry_candidates().map_err(ClipnestError::read)?;

    let expired: Vec<_> = candidates
        .into_iter()
        .filter(|(_, expires_at)| *expires_at <= now)
        .map(|(id, _)| id)
        .collect();

    if expired.is_empty() {
        return Ok(0);
    }

    let deleted = db.delete_items(&expired).map_err(ClipnestError::write)?;
    info!(deleted, "reaped expired clipboard items");
    Ok(deleted as u64)
}

/// Handle to a running background reaper. Cancelling (or dropping) the handle
/// stops the interval task.
pub struct ReaperTask {
    token: CancellationToken,
}

impl ReaperTask {
    /// Spawn a reaper that sweeps every `interval`.
    ///
    /// The first sweep happens one full interval after the spawn. A failed
    /// sweep is logged and abandoned; the next tick starts fresh.
    pub fn spawn(db: Arc<Database>, interval: Duration) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();

        runtime_handle().spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = sweep(&db, Utc::now()) {
                            warn!(%err, "expiry sweep failed");
                        }
                    }
                }
            }
        });

        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for ReaperTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoredItem;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn test_sweep_empty_store_is_noop() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(sweep(&db, Utc::now()).unwrap(), 0);
    }

    #[test]
    fn test_sweep_boundary_is_inclusive() {
        let db = Database::open_in_memory().unwrap();
        let item = StoredItem::new_text("exactly now".to_string(), Some(at(1_000)));
        db.insert_item(&item).unwrap();

        // expires_at == now deletes
        assert_eq!(sweep(&db, at(1_000)).unwrap(), 1);
        assert_eq!(db.count_items().unwrap(), 0);
    }
}
