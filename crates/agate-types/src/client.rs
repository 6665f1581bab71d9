use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, PatchSet, RecordId};
use crate::patch::Patch;

/// A customer organisation that commissions campaigns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: RecordId,
    pub name: String,
    pub address: String,
    pub contact_details: String,
}

/// Client fields without the identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientDraft {
    pub name: String,
    pub address: String,
    pub contact_details: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub address: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub contact_details: Patch<String>,
}

impl PatchSet<ClientDraft> for ClientPatch {
    fn apply_to(self, mut current: ClientDraft) -> ClientDraft {
        self.name.apply_to(&mut current.name);
        self.address.apply_to(&mut current.address);
        self.contact_details.apply_to(&mut current.contact_details);
        current
    }

    fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_present() {
            fields.push("name");
        }
        if self.address.is_present() {
            fields.push("address");
        }
        if self.contact_details.is_present() {
            fields.push("contact_details");
        }
        fields
    }
}

impl Entity for Client {
    const KIND: EntityKind = EntityKind::Client;

    type Draft = ClientDraft;
    type Patch = ClientPatch;

    fn id(&self) -> RecordId {
        self.client_id
    }

    fn from_draft(id: RecordId, draft: ClientDraft) -> Self {
        Self {
            client_id: id,
            name: draft.name,
            address: draft.address,
            contact_details: draft.contact_details,
        }
    }

    fn to_draft(&self) -> ClientDraft {
        ClientDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            contact_details: self.contact_details.clone(),
        }
    }
}
