use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, PatchSet, RecordId};
use crate::patch::Patch;

/// Marks a staff member as eligible to manage campaigns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignManager {
    pub manager_id: RecordId,
    pub staff_id: RecordId,
}

impl CampaignManager {
    pub const STAFF_REF: &'static str = "staff_id";
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignManagerDraft {
    pub staff_id: RecordId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignManagerPatch {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub staff_id: Patch<RecordId>,
}

impl PatchSet<CampaignManagerDraft> for CampaignManagerPatch {
    fn apply_to(self, mut current: CampaignManagerDraft) -> CampaignManagerDraft {
        self.staff_id.apply_to(&mut current.staff_id);
        current
    }

    fn present_fields(&self) -> Vec<&'static str> {
        if self.staff_id.is_present() {
            vec!["staff_id"]
        } else {
            Vec::new()
        }
    }
}

impl Entity for CampaignManager {
    const KIND: EntityKind = EntityKind::CampaignManager;

    type Draft = CampaignManagerDraft;
    type Patch = CampaignManagerPatch;

    fn id(&self) -> RecordId {
        self.manager_id
    }

    fn from_draft(id: RecordId, draft: CampaignManagerDraft) -> Self {
        Self {
            manager_id: id,
            staff_id: draft.staff_id,
        }
    }

    fn to_draft(&self) -> CampaignManagerDraft {
        CampaignManagerDraft {
            staff_id: self.staff_id,
        }
    }

    fn reference(&self, column: &str) -> Option<RecordId> {
        (column == Self::STAFF_REF).then_some(self.staff_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_patch() {
        let patch: CampaignManagerPatch = serde_json::from_str(r#"{"staff_id": 3}"#).unwrap();
        let merged = patch.apply_to(CampaignManagerDraft { staff_id: 1 });
        assert_eq!(merged.staff_id, 3);
    }

    #[test]
    fn wire_shape() {
        let manager = CampaignManager::from_draft(2, CampaignManagerDraft { staff_id: 8 });
        assert_eq!(
            serde_json::to_value(&manager).unwrap(),
            serde_json::json!({"manager_id": 2, "staff_id": 8})
        );
    }
}
