use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

/// A taxonomy node classifying what an organization does. Nodes form a
/// forest via `parent_id`; a child's level is its parent's level plus one.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Activity {
    pub name: String,
    pub parent_id: Option<Id<Activity>>,
    pub level: i32,
}

impl HasId for Activity {
    type IdType = i64;
}
