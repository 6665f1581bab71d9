use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, PatchSet, RecordId};
use crate::patch::Patch;

/// An agency employee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub staff_id: RecordId,
    pub name: String,
    pub role: String,
    pub grade_id: RecordId,
    pub start_date: NaiveDate,
}

impl Staff {
    pub const GRADE_REF: &'static str = "grade_id";
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Staff fields without the identifier. `start_date` defaults to today.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub grade_id: RecordId,
    #[serde(default = "today")]
    pub start_date: NaiveDate,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPatch {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub role: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub grade_id: Patch<RecordId>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub start_date: Patch<NaiveDate>,
}

impl StaffPatch {
    pub fn assign_grade(grade_id: RecordId) -> Self {
        Self {
            grade_id: Patch::Value(grade_id),
            ..Default::default()
        }
    }
}

impl PatchSet<StaffDraft> for StaffPatch {
    fn apply_to(self, mut current: StaffDraft) -> StaffDraft {
        self.name.apply_to(&mut current.name);
        self.role.apply_to(&mut current.role);
        self.grade_id.apply_to(&mut current.grade_id);
        self.start_date.apply_to(&mut current.start_date);
        current
    }

    fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_present() {
            fields.push("name");
        }
        if self.role.is_present() {
            fields.push("role");
        }
        if self.grade_id.is_present() {
            fields.push("grade_id");
        }
        if self.start_date.is_present() {
            fields.push("start_date");
        }
        fields
    }
}

impl Entity for Staff {
    const KIND: EntityKind = EntityKind::Staff;

    type Draft = StaffDraft;
    type Patch = StaffPatch;

    fn id(&self) -> RecordId {
        self.staff_id
    }

    fn from_draft(id: RecordId, draft: StaffDraft) -> Self {
        Self {
            staff_id: id,
            name: draft.name,
            role: draft.role,
            grade_id: draft.grade_id,
            start_date: draft.start_date,
        }
    }

    fn to_draft(&self) -> StaffDraft {
        StaffDraft {
            name: self.name.clone(),
            role: self.role.clone(),
            grade_id: self.grade_id,
            start_date: self.start_date,
        }
    }

    fn reference(&self, column: &str) -> Option<RecordId> {
        (column == Self::GRADE_REF).then_some(self.grade_id)
    }
}
