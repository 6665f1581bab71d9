use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Store-generated record identifier. Assigned once on insert, never changed.
pub type RecordId = i64;

/// The persisted entity families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Client,
    Campaign,
    Staff,
    StaffGrade,
    Advert,
    CampaignManager,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        Self::Client,
        Self::Campaign,
        Self::Staff,
        Self::StaffGrade,
        Self::Advert,
        Self::CampaignManager,
    ];

    /// Human-readable singular name, used in messages ("client updated").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Campaign => "campaign",
            Self::Staff => "staff",
            Self::StaffGrade => "grade",
            Self::Advert => "advert",
            Self::CampaignManager => "campaign manager",
        }
    }

    /// Route prefix of the entity's collection.
    pub fn collection_path(&self) -> &'static str {
        match self {
            Self::Client => "/clients",
            Self::Campaign => "/campaigns",
            Self::Staff => "/staff",
            Self::StaffGrade => "/grades",
            Self::Advert => "/adverts",
            Self::CampaignManager => "/campaign-manager",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How `PUT /{entity}/{id}` writes a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Read-modify-write: only fields present in the body change.
    Merge,
    /// The body is a complete draft and overwrites every column.
    Replace,
}

/// A set of optionally-present field updates for one draft type.
pub trait PatchSet<D>: Clone + fmt::Debug + Default + DeserializeOwned + Send + Sync + 'static {
    /// Overlay the present fields onto `current`.
    fn apply_to(self, current: D) -> D;

    /// Names of the fields this patch carries a value for, in column order.
    fn present_fields(&self) -> Vec<&'static str>;

    fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }
}

/// A persisted record type.
///
/// `Draft` is the record without its identifier: what callers send on
/// create and what the store writes on update. `Patch` is the partial
/// shape accepted for merge updates.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;
    const UPDATE_MODE: UpdateMode = UpdateMode::Merge;

    type Draft: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Patch: PatchSet<Self::Draft>;

    fn id(&self) -> RecordId;

    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    fn to_draft(&self) -> Self::Draft;

    /// Value of a foreign-reference column, used for cross-reference
    /// listings. Returns `None` for unknown columns or unset references.
    fn reference(&self, _column: &str) -> Option<RecordId> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_and_paths() {
        assert_eq!(EntityKind::Client.name(), "client");
        assert_eq!(EntityKind::StaffGrade.name(), "grade");
        assert_eq!(EntityKind::StaffGrade.collection_path(), "/grades");
        assert_eq!(
            EntityKind::CampaignManager.collection_path(),
            "/campaign-manager"
        );
        assert_eq!(format!("{}", EntityKind::CampaignManager), "campaign manager");
    }

    #[test]
    fn collection_paths_are_unique() {
        let mut paths: Vec<_> = EntityKind::ALL.iter().map(|k| k.collection_path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), EntityKind::ALL.len());
    }
}
