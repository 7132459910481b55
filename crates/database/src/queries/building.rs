use directory::database::Result;
use model::{building::Building, WithId};
use sqlx::{Executor, Postgres};
use utility::id::Id;

use super::convert_error;
use crate::data_model::{building::BuildingRow, with_id};

pub async fn get<'c, E>(
    executor: E,
    id: Id<Building>,
) -> Result<Option<WithId<Building>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, address, latitude, longitude
        FROM
            buildings
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_optional(executor)
    .await
    .map_err(convert_error)
    .map(|row: Option<BuildingRow>| row.map(with_id))
}
