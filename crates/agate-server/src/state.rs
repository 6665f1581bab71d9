use std::sync::Arc;

use agate_service::EntityService;
use agate_store::{Database, InMemoryRecordStore, SqlEntity};
use agate_types::{Advert, Campaign, CampaignManager, Client, Entity, Staff, StaffGrade};

/// Shared handler state: one service per entity, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub clients: EntityService<Client>,
    pub campaigns: EntityService<Campaign>,
    pub staff: EntityService<Staff>,
    pub grades: EntityService<StaffGrade>,
    pub adverts: EntityService<Advert>,
    pub managers: EntityService<CampaignManager>,
}

impl AppState {
    /// Services backed by tables of one SQLite database.
    pub fn from_database(db: &Database) -> Self {
        fn sql<E: SqlEntity>(db: &Database) -> EntityService<E>
        where
            E::Draft: agate_service::Validate,
        {
            EntityService::new(Arc::new(db.store::<E>()))
        }

        Self {
            clients: sql(db),
            campaigns: sql(db),
            staff: sql(db),
            grades: sql(db),
            adverts: sql(db),
            managers: sql(db),
        }
    }

    /// Services backed by fresh in-memory stores.
    pub fn in_memory() -> Self {
        fn memory<E: Entity>() -> EntityService<E>
        where
            E::Draft: agate_service::Validate,
        {
            EntityService::new(Arc::new(InMemoryRecordStore::<E>::new()))
        }

        Self {
            clients: memory(),
            campaigns: memory(),
            staff: memory(),
            grades: memory(),
            adverts: memory(),
            managers: memory(),
        }
    }
}

/// Lets generic handlers pick the service for their entity.
pub trait HasService<E: Entity> {
    fn service(&self) -> &EntityService<E>;
}

macro_rules! has_service {
    ($entity:ty, $field:ident) => {
        impl HasService<$entity> for AppState {
            fn service(&self) -> &EntityService<$entity> {
                &self.$field
            }
        }
    };
}

has_service!(Client, clients);
has_service!(Campaign, campaigns);
has_service!(Staff, staff);
has_service!(StaffGrade, grades);
has_service!(Advert, adverts);
has_service!(CampaignManager, managers);
