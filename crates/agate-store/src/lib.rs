//! Record storage for Agate.
//!
//! Each entity type is persisted through a [`RecordStore`]: point lookup,
//! full scan, insert with a generated identifier, whole-draft update, and
//! delete by key. Partial updates are layered on top by the merger in
//! [`merge`], which never needs more than `get` and `update_fields`.
//!
//! # Storage Backends
//!
//! - [`InMemoryRecordStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`SqliteRecordStore`] -- one table of a shared SQLite [`Database`]
//!
//! # Design Rules
//!
//! 1. Identifiers are assigned by the store, exactly once, on insert.
//! 2. Zero affected rows on update or delete is `NotFound`, never success.
//! 3. Foreign references are stored as plain integers. SQLite checks them
//!    only when `enforce_foreign_keys` is set.
//! 4. There is no version column and no locking. Last writer wins.
//! 5. Errors keep their [`ErrorKind`](agate_types::ErrorKind) on the way up.

pub mod error;
pub mod memory;
pub mod merge;
pub mod sqlite;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use merge::{apply_patch, replace};
pub use sqlite::{Database, DatabaseConfig, SqlEntity, SqliteRecordStore};
pub use traits::RecordStore;
