use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, PatchSet, RecordId, UpdateMode};
use crate::error::TypeError;
use crate::patch::Patch;

/// Lifecycle state of a campaign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignState {
    #[default]
    #[serde(rename = "not started")]
    NotStarted,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl CampaignState {
    pub const ALL: [CampaignState; 4] = [
        Self::NotStarted,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Stored and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CampaignState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignState {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| TypeError::UnknownCampaignState(s.to_string()))
    }
}

/// An advertising campaign run for a client.
///
/// `client_id` and `manager_id` are plain references; nothing here checks
/// that the referenced rows exist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: RecordId,
    pub client_id: RecordId,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub estimated_cost: f64,
    pub actual_cost: f64,
    pub completion_status: bool,
    pub current_state: CampaignState,
    pub manager_id: Option<RecordId>,
    pub budget: i64,
}

impl Campaign {
    pub const CLIENT_REF: &'static str = "client_id";
    pub const MANAGER_REF: &'static str = "manager_id";
}

/// Campaign fields without the identifier. Both dates are required.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    #[serde(default)]
    pub client_id: RecordId,
    #[serde(default)]
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub actual_cost: f64,
    #[serde(default)]
    pub completion_status: bool,
    #[serde(default)]
    pub current_state: CampaignState,
    #[serde(default)]
    pub manager_id: Option<RecordId>,
    #[serde(default)]
    pub budget: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignPatch {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub client_id: Patch<RecordId>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub start_date: Patch<NaiveDate>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub end_date: Patch<NaiveDate>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub estimated_cost: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub actual_cost: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub completion_status: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub current_state: Patch<CampaignState>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub manager_id: Patch<RecordId>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub budget: Patch<i64>,
}

impl CampaignPatch {
    pub fn assign_manager(manager_id: RecordId) -> Self {
        Self {
            manager_id: Patch::Value(manager_id),
            ..Default::default()
        }
    }
}

impl PatchSet<CampaignDraft> for CampaignPatch {
    fn apply_to(self, mut current: CampaignDraft) -> CampaignDraft {
        self.client_id.apply_to(&mut current.client_id);
        self.title.apply_to(&mut current.title);
        self.start_date.apply_to(&mut current.start_date);
        self.end_date.apply_to(&mut current.end_date);
        self.estimated_cost.apply_to(&mut current.estimated_cost);
        self.actual_cost.apply_to(&mut current.actual_cost);
        self.completion_status.apply_to(&mut current.completion_status);
        self.current_state.apply_to(&mut current.current_state);
        self.manager_id.map(Some).apply_to(&mut current.manager_id);
        self.budget.apply_to(&mut current.budget);
        current
    }

    fn present_fields(&self) -> Vec<&'static str> {
        [
            ("client_id", self.client_id.is_present()),
            ("title", self.title.is_present()),
            ("start_date", self.start_date.is_present()),
            ("end_date", self.end_date.is_present()),
            ("estimated_cost", self.estimated_cost.is_present()),
            ("actual_cost", self.actual_cost.is_present()),
            ("completion_status", self.completion_status.is_present()),
            ("current_state", self.current_state.is_present()),
            ("manager_id", self.manager_id.is_present()),
            ("budget", self.budget.is_present()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

impl Entity for Campaign {
    const KIND: EntityKind = EntityKind::Campaign;
    const UPDATE_MODE: UpdateMode = UpdateMode::Replace;

    type Draft = CampaignDraft;
    type Patch = CampaignPatch;

    fn id(&self) -> RecordId {
        self.campaign_id
    }

    fn from_draft(id: RecordId, draft: CampaignDraft) -> Self {
        Self {
            campaign_id: id,
            client_id: draft.client_id,
            title: draft.title,
            start_date: draft.start_date,
            end_date: draft.end_date,
            estimated_cost: draft.estimated_cost,
            actual_cost: draft.actual_cost,
            completion_status: draft.completion_status,
            current_state: draft.current_state,
            manager_id: draft.manager_id,
            budget: draft.budget,
        }
    }

    fn to_draft(&self) -> CampaignDraft {
        CampaignDraft {
            client_id: self.client_id,
            title: self.title.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_cost: self.estimated_cost,
            actual_cost: self.actual_cost,
            completion_status: self.completion_status,
            current_state: self.current_state,
            manager_id: self.manager_id,
            budget: self.budget,
        }
    }

    fn reference(&self, column: &str) -> Option<RecordId> {
        match column {
            Self::CLIENT_REF => Some(self.client_id),
            Self::MANAGER_REF => self.manager_id,
            _ => None,
        }
    }
}
