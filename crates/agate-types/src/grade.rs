use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, PatchSet, RecordId};
use crate::patch::Patch;

/// A pay grade that staff are assigned to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffGrade {
    pub grade_id: RecordId,
    pub grade_name: String,
    pub pay_rate: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffGradeDraft {
    pub grade_name: String,
    pub pay_rate: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffGradePatch {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub grade_name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub pay_rate: Patch<i64>,
}

impl PatchSet<StaffGradeDraft> for StaffGradePatch {
    fn apply_to(self, mut current: StaffGradeDraft) -> StaffGradeDraft {
        self.grade_name.apply_to(&mut current.grade_name);
        self.pay_rate.apply_to(&mut current.pay_rate);
        current
    }

    fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.grade_name.is_present() {
            fields.push("grade_name");
        }
        if self.pay_rate.is_present() {
            fields.push("pay_rate");
        }
        fields
    }
}

impl Entity for StaffGrade {
    const KIND: EntityKind = EntityKind::StaffGrade;

    type Draft = StaffGradeDraft;
    type Patch = StaffGradePatch;

    fn id(&self) -> RecordId {
        self.grade_id
    }

    fn from_draft(id: RecordId, draft: StaffGradeDraft) -> Self {
        Self {
            grade_id: id,
            grade_name: draft.grade_name,
            pay_rate: draft.pay_rate,
        }
    }

    fn to_draft(&self) -> StaffGradeDraft {
        StaffGradeDraft {
            grade_name: self.grade_name.clone(),
            pay_rate: self.pay_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_decodes_to_blank_draft() {
        let draft: StaffGradeDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(draft, StaffGradeDraft::default());
    }

    #[test]
    fn zero_pay_rate_is_applied() {
        let current = StaffGradeDraft {
            grade_name: "Senior".into(),
            pay_rate: 42,
        };
        let patch: StaffGradePatch = serde_json::from_str(r#"{"pay_rate": 0}"#).unwrap();
        let merged = patch.apply_to(current);
        assert_eq!(merged.pay_rate, 0);
        assert_eq!(merged.grade_name, "Senior");
    }
}
