use async_trait::async_trait;
use directory::database::{OrganizationRepo, Result};
use indexmap::IndexMap;
use model::{
    activity::Activity,
    building::{Building, Coordinates},
    organization::{Organization, OrganizationRecord},
    WithId,
};
use sqlx::prelude::FromRow;
use utility::{geo::BoundingBox, id::Id};

use crate::{queries, PgDatabase};

/// Organization joined with its building columns.
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationRow {
    pub id: i64,
    pub name: String,
    pub building_id: i64,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl OrganizationRow {
    fn into_record(self) -> OrganizationRecord {
        OrganizationRecord {
            organization: WithId::new(
                Id::new(self.id),
                Organization {
                    name: self.name,
                    building_id: Id::new(self.building_id),
                },
            ),
            phones: Vec::new(),
            building: WithId::new(
                Id::new(self.building_id),
                Building {
                    address: self.address,
                    location: Coordinates {
                        lat: self.latitude,
                        lng: self.longitude,
                    },
                },
            ),
            activities: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PhoneRow {
    pub organization_id: i64,
    pub phone_number: String,
}

/// One organization↔activity link, joined with the activity columns.
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationActivityRow {
    pub organization_id: i64,
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub level: i32,
}

/// Groups phone and activity rows onto their organizations. The index map
/// keeps the organizations in the order the database returned them.
pub fn assemble(
    organizations: Vec<OrganizationRow>,
    phones: Vec<PhoneRow>,
    activities: Vec<OrganizationActivityRow>,
) -> Vec<OrganizationRecord> {
    let mut records: IndexMap<i64, OrganizationRecord> = organizations
        .into_iter()
        .map(|row| (row.id, row.into_record()))
        .collect();

    for phone in phones {
        if let Some(record) = records.get_mut(&phone.organization_id) {
            record.phones.push(phone.phone_number);
        }
    }

    for row in activities {
        if let Some(record) = records.get_mut(&row.organization_id) {
            // duplicate join rows are tolerated, the entry appears once
            if record
                .activities
                .iter()
                .all(|existing| existing.id.raw() != row.id)
            {
                record.activities.push(WithId::new(
                    Id::new(row.id),
                    Activity {
                        name: row.name,
                        parent_id: row.parent_id.map(Id::new),
                        level: row.level,
                    },
                ));
            }
        }
    }

    records.into_values().collect()
}

#[async_trait]
impl OrganizationRepo for PgDatabase {
    async fn organization(
        &self,
        id: Id<Organization>,
    ) -> Result<Option<OrganizationRecord>> {
        queries::organization::get(&self.pool, id).await
    }

    async fn organizations_by_building(
        &self,
        building: Id<Building>,
    ) -> Result<Vec<OrganizationRecord>> {
        queries::organization::by_building(&self.pool, building).await
    }

    async fn organizations_by_activities(
        &self,
        activities: &[Id<Activity>],
    ) -> Result<Vec<OrganizationRecord>> {
        queries::organization::by_activities(&self.pool, activities).await
    }

    async fn organizations_by_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<OrganizationRecord>> {
        queries::organization::by_name(&self.pool, fragment).await
    }

    async fn organizations_in_window(
        &self,
        window: &BoundingBox,
    ) -> Result<Vec<OrganizationRecord>> {
        queries::organization::in_window(&self.pool, window).await
    }
}
