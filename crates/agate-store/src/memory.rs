use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use agate_types::{Entity, RecordId};
use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// In-memory, BTreeMap-based record store.
///
/// Intended for tests and embedding. Drafts are held behind a `RwLock`
/// keyed by identifier; identifiers count up from 1 and are never reused.
pub struct InMemoryRecordStore<E: Entity> {
    rows: RwLock<Rows<E>>,
}

struct Rows<E: Entity> {
    next_id: RecordId,
    drafts: BTreeMap<RecordId, E::Draft>,
}

impl<E: Entity> InMemoryRecordStore<E> {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Rows {
                next_id: 1,
                drafts: BTreeMap::new(),
            }),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.drafts.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Rows<E>>> {
        self.rows
            .read()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Rows<E>>> {
        self.rows
            .write()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".into()))
    }
}

impl<E: Entity> Default for InMemoryRecordStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> RecordStore<E> for InMemoryRecordStore<E> {
    async fn list(&self) -> StoreResult<Vec<E>> {
        let rows = self.read()?;
        Ok(rows
            .drafts
            .iter()
            .map(|(id, draft)| E::from_draft(*id, draft.clone()))
            .collect())
    }

    async fn list_by(&self, column: &'static str, id: RecordId) -> StoreResult<Vec<E>> {
        let rows = self.read()?;
        Ok(rows
            .drafts
            .iter()
            .map(|(record_id, draft)| E::from_draft(*record_id, draft.clone()))
            .filter(|record| record.reference(column) == Some(id))
            .collect())
    }

    async fn get(&self, id: RecordId) -> StoreResult<E> {
        let rows = self.read()?;
        rows.drafts
            .get(&id)
            .map(|draft| E::from_draft(id, draft.clone()))
            .ok_or_else(|| StoreError::not_found(E::KIND, id))
    }

    async fn insert(&self, draft: &E::Draft) -> StoreResult<RecordId> {
        let mut rows = self.write()?;
        let id = rows.next_id;
        rows.next_id += 1;
        rows.drafts.insert(id, draft.clone());
        Ok(id)
    }

    async fn update_fields(&self, id: RecordId, draft: &E::Draft) -> StoreResult<()> {
        let mut rows = self.write()?;
        match rows.drafts.get_mut(&id) {
            Some(slot) => {
                *slot = draft.clone();
                Ok(())
            }
            None => Err(StoreError::not_found(E::KIND, id)),
        }
    }

    async fn delete(&self, id: RecordId) -> StoreResult<()> {
        let mut rows = self.write()?;
        rows.drafts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(E::KIND, id))
    }
}

impl<E: Entity> std::fmt::Debug for InMemoryRecordStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("kind", &E::KIND)
            .field("record_count", &self.len().ok())
            .finish()
    }
}
