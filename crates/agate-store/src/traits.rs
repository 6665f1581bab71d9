use agate_types::{Entity, RecordId};
use async_trait::async_trait;

use crate::error::StoreResult;

/// Durable keyed storage for one entity type.
///
/// All implementations must satisfy these invariants:
/// - Identifiers are assigned by the store on insert and never change.
/// - `get`, `update_fields` and `delete` on an absent id return
///   [`StoreError::NotFound`](crate::StoreError::NotFound). Zero affected
///   rows on a write counts as absent.
/// - `update_fields` writes every column of the draft it is given and
///   nothing else. Merging is the caller's job.
/// - Failures keep their classification; the store never retries.
#[async_trait]
pub trait RecordStore<E: Entity>: Send + Sync {
    /// Every record of the type, in identifier order.
    async fn list(&self) -> StoreResult<Vec<E>>;

    /// Records whose foreign-reference `column` equals `id`.
    async fn list_by(&self, column: &'static str, id: RecordId) -> StoreResult<Vec<E>>;

    async fn get(&self, id: RecordId) -> StoreResult<E>;

    /// Insert a new row and return its generated identifier.
    async fn insert(&self, draft: &E::Draft) -> StoreResult<RecordId>;

    async fn update_fields(&self, id: RecordId, draft: &E::Draft) -> StoreResult<()>;

    async fn delete(&self, id: RecordId) -> StoreResult<()>;
}
