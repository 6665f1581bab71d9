//! Required-field rules checked before a draft reaches the store.

use agate_types::{
    AdvertDraft, CampaignDraft, CampaignManagerDraft, ClientDraft, RecordId, StaffDraft,
    StaffGradeDraft,
};

/// Structural validation of a complete draft.
///
/// Returns the first violated rule as a human-readable reason.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

fn positive(field: &str, value: RecordId) -> Result<(), String> {
    if value <= 0 {
        return Err(format!("{field} must be positive"));
    }
    Ok(())
}

impl Validate for ClientDraft {
    fn validate(&self) -> Result<(), String> {
        required("name", &self.name)
    }
}

impl Validate for StaffGradeDraft {
    fn validate(&self) -> Result<(), String> {
        required("grade_name", &self.grade_name)?;
        positive("pay_rate", self.pay_rate)
    }
}

impl Validate for StaffDraft {
    fn validate(&self) -> Result<(), String> {
        required("name", &self.name)?;
        positive("grade_id", self.grade_id)
    }
}

impl Validate for CampaignManagerDraft {
    fn validate(&self) -> Result<(), String> {
        positive("staff_id", self.staff_id)
    }
}

impl Validate for CampaignDraft {
    fn validate(&self) -> Result<(), String> {
        positive("client_id", self.client_id)?;
        required("title", &self.title)?;
        if self.end_date < self.start_date {
            return Err("end_date must not be before start_date".into());
        }
        if let Some(manager_id) = self.manager_id {
            positive("manager_id", manager_id)?;
        }
        Ok(())
    }
}

impl Validate for AdvertDraft {
    fn validate(&self) -> Result<(), String> {
        positive("campaign_id", self.campaign_id)?;
        required("progress", &self.progress)
    }
}
