use directory::database::Result;
use model::organization::{Organization, OrganizationRecord};
use model::{activity::Activity, building::Building};
use sqlx::PgPool;
use utility::{geo::BoundingBox, id::Id};

use super::convert_error;
use crate::data_model::organization::{
    assemble, OrganizationActivityRow, OrganizationRow, PhoneRow,
};

pub async fn get(
    pool: &PgPool,
    id: Id<Organization>,
) -> Result<Option<OrganizationRecord>> {
    let row: Option<OrganizationRow> = sqlx::query_as(
        "
        SELECT
            o.id, o.name, o.building_id, b.address, b.latitude, b.longitude
        FROM
            organizations o
            JOIN buildings b ON b.id = o.building_id
        WHERE o.id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_optional(pool)
    .await
    .map_err(convert_error)?;

    match row {
        Some(row) => {
            let records = attach_details(pool, vec![row]).await?;
            Ok(records.into_iter().next())
        }
        None => Ok(None),
    }
}

pub async fn by_building(
    pool: &PgPool,
    building: Id<Building>,
) -> Result<Vec<OrganizationRecord>> {
    let rows: Vec<OrganizationRow> = sqlx::query_as(
        "
        SELECT
            o.id, o.name, o.building_id, b.address, b.latitude, b.longitude
        FROM
            organizations o
            JOIN buildings b ON b.id = o.building_id
        WHERE o.building_id = $1
        ORDER BY o.id;
        ",
    )
    .bind(building.raw())
    .fetch_all(pool)
    .await
    .map_err(convert_error)?;

    attach_details(pool, rows).await
}

pub async fn by_activities(
    pool: &PgPool,
    activities: &[Id<Activity>],
) -> Result<Vec<OrganizationRecord>> {
    let activities: Vec<i64> = activities.iter().map(|id| id.raw()).collect();

    let rows: Vec<OrganizationRow> = sqlx::query_as(
        "
        SELECT
            o.id, o.name, o.building_id, b.address, b.latitude, b.longitude
        FROM
            organizations o
            JOIN buildings b ON b.id = o.building_id
        WHERE o.id IN (
            SELECT DISTINCT organization_id
            FROM organization_activities
            WHERE activity_id = ANY($1)
        )
        ORDER BY o.id;
        ",
    )
    .bind(&activities[..])
    .fetch_all(pool)
    .await
    .map_err(convert_error)?;

    attach_details(pool, rows).await
}

pub async fn by_name(
    pool: &PgPool,
    fragment: &str,
) -> Result<Vec<OrganizationRecord>> {
    let pattern = format!("%{}%", fragment);

    let rows: Vec<OrganizationRow> = sqlx::query_as(
        "
        SELECT
            o.id, o.name, o.building_id, b.address, b.latitude, b.longitude
        FROM
            organizations o
            JOIN buildings b ON b.id = o.building_id
        WHERE o.name ILIKE $1
        ORDER BY o.id;
        ",
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
    .map_err(convert_error)?;

    attach_details(pool, rows).await
}

pub async fn in_window(
    pool: &PgPool,
    window: &BoundingBox,
) -> Result<Vec<OrganizationRecord>> {
    let rows: Vec<OrganizationRow> = sqlx::query_as(
        "
        SELECT
            o.id, o.name, o.building_id, b.address, b.latitude, b.longitude
        FROM
            organizations o
            JOIN buildings b ON b.id = o.building_id
        WHERE
            b.latitude BETWEEN $1 AND $2
            AND b.longitude BETWEEN $3 AND $4
        ORDER BY o.id;
        ",
    )
    .bind(window.min_lat)
    .bind(window.max_lat)
    .bind(window.min_lng)
    .bind(window.max_lng)
    .fetch_all(pool)
    .await
    .map_err(convert_error)?;

    attach_details(pool, rows).await
}

/// Loads phone and activity rows for the given organizations in two batched
/// queries and groups them onto the records.
async fn attach_details(
    pool: &PgPool,
    rows: Vec<OrganizationRow>,
) -> Result<Vec<OrganizationRecord>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let phones: Vec<PhoneRow> = sqlx::query_as(
        "
        SELECT
            organization_id, phone_number
        FROM
            organization_phones
        WHERE organization_id = ANY($1)
        ORDER BY id;
        ",
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await
    .map_err(convert_error)?;

    let activities: Vec<OrganizationActivityRow> = sqlx::query_as(
        "
        SELECT
            oa.organization_id, a.id, a.name, a.parent_id, a.level
        FROM
            organization_activities oa
            JOIN activities a ON a.id = oa.activity_id
        WHERE oa.organization_id = ANY($1)
        ORDER BY oa.id;
        ",
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await
    .map_err(convert_error)?;

    Ok(assemble(rows, phones, activities))
}
