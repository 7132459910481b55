use async_trait::async_trait;
use directory::database::{BuildingRepo, Result};
use model::{
    building::{Building, Coordinates},
    WithId,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;
use crate::{queries::building::get, PgDatabase};

#[derive(Debug, Clone, FromRow)]
pub struct BuildingRow {
    pub id: i64,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl DatabaseRow for BuildingRow {
    type Model = Building;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        Building {
            address: self.address,
            location: Coordinates {
                lat: self.latitude,
                lng: self.longitude,
            },
        }
    }
}

#[async_trait]
impl BuildingRepo for PgDatabase {
    async fn building(&self, id: Id<Building>) -> Result<Option<WithId<Building>>> {
        get(&self.pool, id).await
    }
}
