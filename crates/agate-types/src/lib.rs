//! Foundation types for Agate, the advertising agency record service.
//!
//! Every other Agate crate depends on `agate-types`. It defines the six
//! record families, their identifier-less drafts, and the partial-update
//! patches that drive merge updates.
//!
//! # Key Types
//!
//! - [`Entity`] — A persisted record type with its `Draft` and `Patch` shapes
//! - [`Patch`] — Three-state field update: missing, explicit null, or value
//! - [`PatchSet`] — A struct of [`Patch`] fields that overlays onto a draft
//! - [`EntityKind`] — Names and route prefixes of the record families
//! - [`ErrorKind`] — Failure classification shared by store, service, and server

pub mod advert;
pub mod campaign;
pub mod client;
pub mod entity;
pub mod error;
pub mod grade;
pub mod manager;
pub mod patch;
pub mod staff;

pub use advert::{Advert, AdvertDraft, AdvertPatch};
pub use campaign::{Campaign, CampaignDraft, CampaignPatch, CampaignState};
pub use client::{Client, ClientDraft, ClientPatch};
pub use entity::{Entity, EntityKind, PatchSet, RecordId, UpdateMode};
pub use error::{ErrorKind, TypeError};
pub use grade::{StaffGrade, StaffGradeDraft, StaffGradePatch};
pub use manager::{CampaignManager, CampaignManagerDraft, CampaignManagerPatch};
pub use patch::Patch;
pub use staff::{Staff, StaffDraft, StaffPatch};
