use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{activity::Activity, building::Building, WithId};

/// A business entity tied to exactly one building.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Organization {
    pub name: String,
    pub building_id: Id<Building>,
}

impl HasId for Organization {
    type IdType = i64;
}

/// An organization joined with everything the directory reports about it:
/// its building, phone numbers (in database order) and activity tags.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct OrganizationRecord {
    pub organization: WithId<Organization>,
    pub phones: Vec<String>,
    pub building: WithId<Building>,
    pub activities: Vec<WithId<Activity>>,
}

impl OrganizationRecord {
    pub fn id(&self) -> Id<Organization> {
        self.organization.id
    }

    pub fn name(&self) -> &str {
        &self.organization.content.name
    }
}
