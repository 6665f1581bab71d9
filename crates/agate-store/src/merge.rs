//! Partial-update merger.
//!
//! Merge updates are a read-modify-write over a [`RecordStore`]: fetch the
//! current record, overlay the present patch fields, write the whole draft
//! back. The sequence is not atomic. Two concurrent merges on the same id
//! can lose an update; last writer wins.

use agate_types::{Entity, PatchSet, RecordId};
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::RecordStore;

/// Merge `patch` into record `id` and return the record as written.
///
/// A patch with no present fields skips the write but still fails with
/// `NotFound` when the record does not exist.
pub async fn apply_patch<E: Entity>(
    store: &dyn RecordStore<E>,
    id: RecordId,
    patch: E::Patch,
) -> StoreResult<E> {
    let current = store.get(id).await?;
    let fields = patch.present_fields();
    if fields.is_empty() {
        debug!(entity = %E::KIND, id, "empty patch, nothing to write");
        return Ok(current);
    }

    let merged = patch.apply_to(current.to_draft());
    store.update_fields(id, &merged).await?;
    debug!(entity = %E::KIND, id, ?fields, "merged partial update");
    Ok(E::from_draft(id, merged))
}

/// Overwrite record `id` with a complete draft.
pub async fn replace<E: Entity>(
    store: &dyn RecordStore<E>,
    id: RecordId,
    draft: E::Draft,
) -> StoreResult<E> {
    store.update_fields(id, &draft).await?;
    debug!(entity = %E::KIND, id, "replaced record");
    Ok(E::from_draft(id, draft))
}
