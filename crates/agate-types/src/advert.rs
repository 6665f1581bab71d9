use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, PatchSet, RecordId};
use crate::patch::Patch;

/// A single advert placement belonging to a campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advert {
    pub advert_id: RecordId,
    pub campaign_id: RecordId,
    pub progress: String,
    pub run_date: DateTime<Utc>,
}

impl Advert {
    pub const CAMPAIGN_REF: &'static str = "campaign_id";
}

/// Advert fields without the identifier. `run_date` is required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertDraft {
    #[serde(default)]
    pub campaign_id: RecordId,
    #[serde(default)]
    pub progress: String,
    pub run_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertPatch {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub campaign_id: Patch<RecordId>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub progress: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub run_date: Patch<DateTime<Utc>>,
}

impl PatchSet<AdvertDraft> for AdvertPatch {
    fn apply_to(self, mut current: AdvertDraft) -> AdvertDraft {
        self.campaign_id.apply_to(&mut current.campaign_id);
        self.progress.apply_to(&mut current.progress);
        self.run_date.apply_to(&mut current.run_date);
        current
    }

    fn present_fields(&self) -> Vec<&'static str> {
        [
            ("campaign_id", self.campaign_id.is_present()),
            ("progress", self.progress.is_present()),
            ("run_date", self.run_date.is_present()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

impl Entity for Advert {
    const KIND: EntityKind = EntityKind::Advert;

    type Draft = AdvertDraft;
    type Patch = AdvertPatch;

    fn id(&self) -> RecordId {
        self.advert_id
    }

    fn from_draft(id: RecordId, draft: AdvertDraft) -> Self {
        Self {
            advert_id: id,
            campaign_id: draft.campaign_id,
            progress: draft.progress,
            run_date: draft.run_date,
        }
    }

    fn to_draft(&self) -> AdvertDraft {
        AdvertDraft {
            campaign_id: self.campaign_id,
            progress: self.progress.clone(),
            run_date: self.run_date,
        }
    }

    fn reference(&self, column: &str) -> Option<RecordId> {
        (column == Self::CAMPAIGN_REF).then_some(self.campaign_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn run_date_is_rfc3339() {
        let draft: AdvertDraft = serde_json::from_str(
            r#"{"campaign_id": 4, "progress": "booked", "run_date": "2024-04-02T09:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(
            draft.run_date,
            Utc.with_ymd_and_hms(2024, 4, 2, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn run_date_is_required() {
        assert!(serde_json::from_str::<AdvertDraft>(r#"{"campaign_id": 4}"#).is_err());
    }

    #[test]
    fn progress_patch() {
        let current = AdvertDraft {
            campaign_id: 4,
            progress: "booked".into(),
            run_date: Utc.with_ymd_and_hms(2024, 4, 2, 9, 30, 0).unwrap(),
        };
        let patch: AdvertPatch = serde_json::from_str(r#"{"progress": "aired"}"#).unwrap();
        let merged = patch.apply_to(current.clone());
        assert_eq!(merged.progress, "aired");
        assert_eq!(merged.run_date, current.run_date);
        assert_eq!(merged.campaign_id, 4);
    }
}
