//! Clipnest Core - Rust business logic for clipboard history
//!
//! This library implements the ingestion and retention core of the Clipnest
//! clipboard-history app. The Swift host drives it with two triggers: an
//! activation event (check the pasteboard, ingest new content) and a periodic
//! tick (reap expired, unpinned items).
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Enum)]).
//!
//! # Architecture
//! - `interface`: FFI-visible types, source of truth for shared definitions
//! - `content_detection`: smart classification (URL/email/phone/plain)
//! - `models`: internal item model
//! - `database`: SQLite item store
//! - `pasteboard`: raw pasteboard readers, injected at composition time
//! - `ingest`: last-seen state and duplicate suppression
//! - `reaper`: expiry sweep and background interval task
//! - `store`: `ClipboardStore` facade for Swift interop

pub mod content_detection;
pub mod database;
pub mod ingest;
pub mod interface;
pub mod models;
pub mod pasteboard;
pub mod reaper;
mod store;

pub use interface::*;
pub use store::{ClipboardStore, DEFAULT_REAP_INTERVAL_SECS};

uniffi::setup_scaffolding!("clipnest_core");
