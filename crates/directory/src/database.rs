use std::{error, result};

use async_trait::async_trait;
use model::{
    activity::Activity,
    building::Building,
    organization::{Organization, OrganizationRecord},
    WithId,
};
use utility::{geo::BoundingBox, id::Id};

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    Other(Box<dyn error::Error + Send + Sync>),
}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait BuildingRepo {
    async fn building(&self, id: Id<Building>) -> Result<Option<WithId<Building>>>;
}

#[async_trait]
pub trait ActivityRepo {
    async fn activity(&self, id: Id<Activity>) -> Result<Option<WithId<Activity>>>;

    /// Ids of all activities whose parent is one of `parents`. One call per
    /// traversal level keeps the adjacency id-based instead of loading a
    /// recursive object graph.
    async fn activity_children(
        &self,
        parents: &[Id<Activity>],
    ) -> Result<Vec<Id<Activity>>>;
}

#[async_trait]
pub trait OrganizationRepo {
    async fn organization(
        &self,
        id: Id<Organization>,
    ) -> Result<Option<OrganizationRecord>>;

    async fn organizations_by_building(
        &self,
        building: Id<Building>,
    ) -> Result<Vec<OrganizationRecord>>;

    /// Organizations tagged with at least one of the given activities.
    /// Duplicate join rows must not yield duplicate organizations.
    async fn organizations_by_activities(
        &self,
        activities: &[Id<Activity>],
    ) -> Result<Vec<OrganizationRecord>>;

    /// Case-insensitive substring match on the organization name.
    async fn organizations_by_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<OrganizationRecord>>;

    /// Organizations whose building lies inside the window, inclusive on
    /// all four edges.
    async fn organizations_in_window(
        &self,
        window: &BoundingBox,
    ) -> Result<Vec<OrganizationRecord>>;
}

pub trait Database:
    BuildingRepo + ActivityRepo + OrganizationRepo + Send + Sync
{
}
