use std::sync::Arc;

use agate_store::{apply_patch, replace, RecordStore};
use agate_types::{Campaign, CampaignPatch, Entity, PatchSet, RecordId, Staff, StaffPatch};
use tracing::{debug, info, warn};

use crate::error::{Operation, ServiceError, ServiceResult};
use crate::validate::Validate;

/// Business rules around one entity's [`RecordStore`].
///
/// Identifiers must be positive and drafts must pass [`Validate`]; both are
/// checked before the store is touched. Store failures come back wrapped
/// with entity and operation context but keep their kind.
pub struct EntityService<E: Entity> {
    store: Arc<dyn RecordStore<E>>,
}

impl<E: Entity> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<E: Entity> EntityService<E>
where
    E::Draft: Validate,
{
    pub fn new(store: Arc<dyn RecordStore<E>>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ServiceResult<Vec<E>> {
        self.store
            .list()
            .await
            .map_err(|err| ServiceError::store(E::KIND, Operation::List, None, err))
    }

    /// Records whose reference `column` points at `id`.
    pub async fn list_by(&self, column: &'static str, id: RecordId) -> ServiceResult<Vec<E>> {
        check_id::<E>(id)?;
        self.store
            .list_by(column, id)
            .await
            .map_err(|err| ServiceError::store(E::KIND, Operation::List, None, err))
    }

    pub async fn get(&self, id: RecordId) -> ServiceResult<E> {
        check_id::<E>(id)?;
        self.store
            .get(id)
            .await
            .map_err(|err| ServiceError::store(E::KIND, Operation::Get, Some(id), err))
    }

    /// Validate and insert a new record, returning its identifier.
    pub async fn create(&self, draft: E::Draft) -> ServiceResult<RecordId> {
        if let Err(reason) = draft.validate() {
            warn!(entity = %E::KIND, %reason, "rejected create");
            return Err(ServiceError::invalid(E::KIND, reason));
        }
        let id = self
            .store
            .insert(&draft)
            .await
            .map_err(|err| ServiceError::store(E::KIND, Operation::Create, None, err))?;
        info!(entity = %E::KIND, id, "created");
        Ok(id)
    }

    /// Merge the present fields of `patch` into record `id`.
    pub async fn update(&self, id: RecordId, patch: E::Patch) -> ServiceResult<E> {
        check_id::<E>(id)?;
        let fields = patch.present_fields();
        let record = apply_patch(self.store.as_ref(), id, patch)
            .await
            .map_err(|err| ServiceError::store(E::KIND, Operation::Update, Some(id), err))?;
        info!(entity = %E::KIND, id, ?fields, "updated");
        Ok(record)
    }

    /// Overwrite record `id` with a complete, validated draft.
    pub async fn replace(&self, id: RecordId, draft: E::Draft) -> ServiceResult<E> {
        check_id::<E>(id)?;
        if let Err(reason) = draft.validate() {
            warn!(entity = %E::KIND, id, %reason, "rejected replace");
            return Err(ServiceError::invalid(E::KIND, reason));
        }
        let record = replace(self.store.as_ref(), id, draft)
            .await
            .map_err(|err| ServiceError::store(E::KIND, Operation::Update, Some(id), err))?;
        info!(entity = %E::KIND, id, "replaced");
        Ok(record)
    }

    pub async fn delete(&self, id: RecordId) -> ServiceResult<()> {
        check_id::<E>(id)?;
        self.store
            .delete(id)
            .await
            .map_err(|err| ServiceError::store(E::KIND, Operation::Delete, Some(id), err))?;
        info!(entity = %E::KIND, id, "deleted");
        Ok(())
    }
}

impl EntityService<Campaign> {
    /// Point a campaign at a campaign manager, leaving every other field alone.
    pub async fn assign_manager(
        &self,
        campaign_id: RecordId,
        manager_id: RecordId,
    ) -> ServiceResult<Campaign> {
        check_id::<Campaign>(campaign_id)?;
        if manager_id <= 0 {
            return Err(ServiceError::invalid(
                Campaign::KIND,
                "manager_id must be positive",
            ));
        }
        debug!(campaign_id, manager_id, "assigning manager");
        self.update(campaign_id, CampaignPatch::assign_manager(manager_id))
            .await
    }

    pub async fn for_client(&self, client_id: RecordId) -> ServiceResult<Vec<Campaign>> {
        self.list_by(Campaign::CLIENT_REF, client_id).await
    }
}

impl EntityService<Staff> {
    /// Move a staff member to another grade, leaving every other field alone.
    pub async fn assign_grade(
        &self,
        staff_id: RecordId,
        grade_id: RecordId,
    ) -> ServiceResult<Staff> {
        check_id::<Staff>(staff_id)?;
        if grade_id <= 0 {
            return Err(ServiceError::invalid(Staff::KIND, "grade_id must be positive"));
        }
        debug!(staff_id, grade_id, "assigning grade");
        self.update(staff_id, StaffPatch::assign_grade(grade_id)).await
    }
}

fn check_id<E: Entity>(id: RecordId) -> ServiceResult<()> {
    if id <= 0 {
        warn!(entity = %E::KIND, id, "rejected non-positive id");
        return Err(ServiceError::invalid(
            E::KIND,
            format!("{} ID must be positive", E::KIND),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use agate_store::{InMemoryRecordStore, StoreResult};
    use agate_types::{
        Advert, AdvertDraft, CampaignDraft, CampaignState, Client, ClientDraft, ClientPatch,
        ErrorKind, Patch, StaffDraft, StaffGrade, StaffGradeDraft,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;

    /// Counts every call that reaches the store.
    struct CountingStore<E: Entity> {
        inner: InMemoryRecordStore<E>,
        calls: AtomicUsize,
    }

    impl<E: Entity> CountingStore<E> {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                inner: InMemoryRecordStore::new(),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn tick(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl<E: Entity> RecordStore<E> for CountingStore<E> {
        async fn list(&self) -> StoreResult<Vec<E>> {
            self.tick();
            self.inner.list().await
        }

        async fn list_by(&self, column: &'static str, id: RecordId) -> StoreResult<Vec<E>> {
            self.tick();
            self.inner.list_by(column, id).await
        }

        async fn get(&self, id: RecordId) -> StoreResult<E> {
            self.tick();
            self.inner.get(id).await
        }

        async fn insert(&self, draft: &E::Draft) -> StoreResult<RecordId> {
            self.tick();
            self.inner.insert(draft).await
        }

        async fn update_fields(&self, id: RecordId, draft: &E::Draft) -> StoreResult<()> {
            self.tick();
            self.inner.update_fields(id, draft).await
        }

        async fn delete(&self, id: RecordId) -> StoreResult<()> {
            self.tick();
            self.inner.delete(id).await
        }
    }

    fn service<E: Entity>() -> (EntityService<E>, Arc<CountingStore<E>>)
    where
        E::Draft: Validate,
    {
        let store = CountingStore::<E>::new();
        (EntityService::new(store.clone()), store)
    }

    fn acme() -> ClientDraft {
        ClientDraft {
            name: "Acme".into(),
            address: "1 Main St".into(),
            contact_details: "a@x.com".into(),
        }
    }

    fn launch() -> CampaignDraft {
        CampaignDraft {
            client_id: 3,
            title: "Spring launch".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            estimated_cost: 12000.0,
            actual_cost: 0.0,
            completion_status: false,
            current_state: CampaignState::InProgress,
            manager_id: None,
            budget: 15000,
        }
    }

    #[tokio::test]
    async fn invalid_grade_never_reaches_store() {
        let (grades, store) = service::<StaffGrade>();
        let blank = StaffGradeDraft {
            grade_name: String::new(),
            pay_rate: 0,
        };
        let err = grades.create(blank).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(store.calls(), 0);
        assert!(store.inner.is_empty().unwrap());
    }

    #[tokio::test]
    async fn non_positive_ids_never_reach_store() {
        let (clients, store) = service::<Client>();
        for id in [0, -1] {
            assert_eq!(
                clients.get(id).await.unwrap_err().kind(),
                ErrorKind::InvalidArgument
            );
            assert_eq!(
                clients
                    .update(id, ClientPatch::default())
                    .await
                    .unwrap_err()
                    .kind(),
                ErrorKind::InvalidArgument
            );
            assert_eq!(
                clients.delete(id).await.unwrap_err().kind(),
                ErrorKind::InvalidArgument
            );
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn create_then_get() {
        let (clients, _) = service::<Client>();
        let id = clients.create(acme()).await.unwrap();
        assert_eq!(clients.get(id).await.unwrap(), Client::from_draft(id, acme()));
    }

    #[tokio::test]
    async fn missing_record_keeps_not_found() {
        let (clients, _) = service::<Client>();
        let err = clients.get(9999).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "failed to get client 9999: client 9999 not found");

        let patch = ClientPatch {
            address: Patch::Value("2 Oak Ave".into()),
            ..Default::default()
        };
        assert_eq!(
            clients.update(9999, patch).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            clients.delete(9999).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn update_merges_present_fields() {
        let (clients, _) = service::<Client>();
        let id = clients.create(acme()).await.unwrap();
        let patch = ClientPatch {
            address: Patch::Value("2 Oak Ave".into()),
            ..Default::default()
        };
        let updated = clients.update(id, patch).await.unwrap();
        assert_eq!(updated.name, "Acme");
        assert_eq!(updated.address, "2 Oak Ave");
        assert_eq!(clients.get(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn replace_validates_and_overwrites() {
        let (campaigns, store) = service::<Campaign>();
        let id = campaigns.create(launch()).await.unwrap();

        let mut backwards = launch();
        backwards.end_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let calls = store.calls();
        assert_eq!(
            campaigns.replace(id, backwards).await.unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(store.calls(), calls);

        let mut revised = launch();
        revised.title = "Summer launch".into();
        revised.budget = 0;
        let replaced = campaigns.replace(id, revised.clone()).await.unwrap();
        assert_eq!(replaced.to_draft(), revised);
    }

    #[tokio::test]
    async fn assign_manager_touches_only_manager() {
        let (campaigns, _) = service::<Campaign>();
        let id = campaigns.create(launch()).await.unwrap();
        let assigned = campaigns.assign_manager(id, 4).await.unwrap();
        assert_eq!(assigned.manager_id, Some(4));
        assert_eq!(assigned.title, "Spring launch");

        assert_eq!(
            campaigns.assign_manager(id, 0).await.unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            campaigns.assign_manager(9999, 4).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn campaigns_for_client() {
        let (campaigns, _) = service::<Campaign>();
        campaigns.create(launch()).await.unwrap();
        let mut other = launch();
        other.client_id = 8;
        campaigns.create(other).await.unwrap();

        let found = campaigns.for_client(3).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].client_id, 3);
        assert!(campaigns.for_client(0).await.is_err());
    }

    #[tokio::test]
    async fn assign_grade_touches_only_grade() {
        let (staff, _) = service::<Staff>();
        let id = staff
            .create(StaffDraft {
                name: "Dana".into(),
                role: "designer".into(),
                grade_id: 2,
                start_date: NaiveDate::from_ymd_opt(2023, 1, 9).unwrap(),
            })
            .await
            .unwrap();
        let moved = staff.assign_grade(id, 5).await.unwrap();
        assert_eq!(moved.grade_id, 5);
        assert_eq!(moved.role, "designer");
    }

    #[tokio::test]
    async fn adverts_by_campaign() {
        let (adverts, _) = service::<Advert>();
        for campaign_id in [1, 1, 2] {
            adverts
                .create(AdvertDraft {
                    campaign_id,
                    progress: "booked".into(),
                    run_date: chrono::Utc::now(),
                })
                .await
                .unwrap();
        }
        let found = adverts.list_by(Advert::CAMPAIGN_REF, 1).await.unwrap();
        assert_eq!(found.len(), 2);
    }
}
