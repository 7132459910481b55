use async_trait::async_trait;
use directory::database::{ActivityRepo, Result};
use model::{activity::Activity, WithId};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;
use crate::{
    queries::activity::{children_of, get},
    PgDatabase,
};

#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i32,
}

impl DatabaseRow for ActivityRow {
    type Model = Activity;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        Activity {
            name: self.name,
            parent_id: self.parent_id.map(Id::new),
            level: self.level,
        }
    }
}

#[async_trait]
impl ActivityRepo for PgDatabase {
    async fn activity(&self, id: Id<Activity>) -> Result<Option<WithId<Activity>>> {
        get(&self.pool, id).await
    }

    async fn activity_children(
        &self,
        parents: &[Id<Activity>],
    ) -> Result<Vec<Id<Activity>>> {
        children_of(&self.pool, parents).await
    }
}
