use std::fmt::Debug;

use schemars::JsonSchema;
use serde::Serialize;
use utility::id::{HasId, Id};

pub mod activity;
pub mod building;
pub mod organization;

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use utility::id::Id;

    use crate::{
        building::{Building, Coordinates},
        WithId,
    };

    #[test]
    fn with_id_serializes_the_id_beside_the_content() {
        let building = WithId::new(
            Id::new(1),
            Building {
                address: "Lenina St 1".to_owned(),
                location: Coordinates {
                    lat: 55.75,
                    lng: 37.62,
                },
            },
        );
        assert_eq!(
            serde_json::to_value(&building).unwrap(),
            json!({
                "id": 1,
                "address": "Lenina St 1",
                "location": { "lat": 55.75, "lng": 37.62 }
            })
        );
    }
}
