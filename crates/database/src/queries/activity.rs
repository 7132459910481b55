use directory::database::Result;
use model::{activity::Activity, WithId};
use sqlx::{Executor, Postgres};
use utility::id::Id;

use super::convert_error;
use crate::data_model::{activity::ActivityRow, with_id};

pub async fn get<'c, E>(
    executor: E,
    id: Id<Activity>,
) -> Result<Option<WithId<Activity>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, name, parent_id, level
        FROM
            activities
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_optional(executor)
    .await
    .map_err(convert_error)
    .map(|row: Option<ActivityRow>| row.map(with_id))
}

pub async fn children_of<'c, E>(
    executor: E,
    parents: &[Id<Activity>],
) -> Result<Vec<Id<Activity>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let parents: Vec<i64> = parents.iter().map(|id| id.raw()).collect();

    sqlx::query_scalar(
        "
        SELECT
            id
        FROM
            activities
        WHERE parent_id = ANY($1)
        ORDER BY id;
        ",
    )
    .bind(&parents[..])
    .fetch_all(executor)
    .await
    .map_err(convert_error)
    .map(|ids: Vec<i64>| ids.into_iter().map(Id::new).collect())
}
