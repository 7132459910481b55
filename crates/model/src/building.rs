use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

/// A physical location housing zero or more organizations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Building {
    pub address: String,
    pub location: Coordinates,
}

impl Building {
    pub fn latitude(&self) -> f64 {
        self.location.lat
    }

    pub fn longitude(&self) -> f64 {
        self.location.lng
    }
}

impl HasId for Building {
    type IdType = i64;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}
