use std::collections::HashSet;

use model::{
    activity::Activity,
    building::{Building, Coordinates},
    organization::{Organization, OrganizationRecord},
    WithId,
};
use serde::Deserialize;
use utility::{
    geo::{self, BoundingBox},
    id::Id,
};

use crate::{database::Database, RequestError, RequestResult, ValidationErrors};

const BBOX_FORMAT_MESSAGE: &str = "The bbox parameter must contain exactly 4 \
     floating-point numbers separated by commas without spaces. \
     Example: 55.9,37.5,56.0,37.6";

/// Raw query parameters of a nearby search, validated here rather than at
/// the HTTP layer so the rules hold for every caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
    pub bbox: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NearbySearch {
    pub center: Coordinates,
    pub radius: Option<f64>,
    pub bbox: Option<String>,
    pub organizations: Vec<OrganizationRecord>,
}

#[derive(Debug, Clone)]
pub struct ActivitySearch {
    pub activity: WithId<Activity>,
    pub included_activity_ids: Vec<Id<Activity>>,
    pub organizations: Vec<OrganizationRecord>,
}

#[derive(Debug, Clone)]
pub struct NameSearch {
    pub query: String,
    pub organizations: Vec<OrganizationRecord>,
}

/// Read-only query service over the organization directory.
#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database,
{
    database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }

    pub async fn organizations_by_building(
        &self,
        id: Id<Building>,
    ) -> RequestResult<(WithId<Building>, Vec<OrganizationRecord>)> {
        let building = self
            .database
            .building(id)
            .await?
            .ok_or(RequestError::not_found("Building"))?;
        let organizations = self.database.organizations_by_building(id).await?;
        Ok((building, organizations))
    }

    /// Direct membership only; descendant activities are not included.
    pub async fn organizations_by_activity(
        &self,
        id: Id<Activity>,
    ) -> RequestResult<(WithId<Activity>, Vec<OrganizationRecord>)> {
        let activity = self
            .database
            .activity(id)
            .await?
            .ok_or(RequestError::not_found("Activity"))?;
        let organizations =
            self.database.organizations_by_activities(&[id]).await?;
        Ok((activity, organizations))
    }

    pub async fn organization_by_id(
        &self,
        id: Id<Organization>,
    ) -> RequestResult<OrganizationRecord> {
        self.database
            .organization(id)
            .await?
            .ok_or(RequestError::not_found("Organization"))
    }

    /// Radius mode when `radius` is supplied (it wins when both are given),
    /// bounding box mode when only `bbox` is supplied. Providing neither is
    /// a bad request.
    pub async fn organizations_nearby(
        &self,
        params: NearbyParams,
    ) -> RequestResult<NearbySearch> {
        let mut errors = ValidationErrors::new();

        let lat = require_number(&mut errors, "lat", params.lat.as_deref());
        let lng = require_number(&mut errors, "lng", params.lng.as_deref());
        let radius =
            optional_number(&mut errors, "radius", params.radius.as_deref());
        if !(-90.0..=90.0).contains(&lat) && errors.is_empty() {
            errors.add("lat", "The lat field must be between -90 and 90.");
        }

        let window = match params.bbox.as_deref() {
            Some(raw) => match raw.parse::<BoundingBox>() {
                Ok(window) => Some(window),
                Err(_) => {
                    errors.add("bbox", BBOX_FORMAT_MESSAGE);
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors.into());
        }

        let center = Coordinates { lat, lng };
        if let Some(radius_km) = radius {
            // rectangular pre-filter first, exact distance decides
            let prefilter = geo::search_window(lat, lng, radius_km);
            let candidates =
                self.database.organizations_in_window(&prefilter).await?;
            let organizations = candidates
                .into_iter()
                .filter(|record| {
                    let building = &record.building.content;
                    geo::great_circle_distance(
                        lat,
                        lng,
                        building.latitude(),
                        building.longitude(),
                    ) <= radius_km
                })
                .collect();
            Ok(NearbySearch {
                center,
                radius: Some(radius_km),
                bbox: params.bbox,
                organizations,
            })
        } else if let Some(window) = window {
            let organizations =
                self.database.organizations_in_window(&window).await?;
            Ok(NearbySearch {
                center,
                radius: None,
                bbox: params.bbox,
                organizations,
            })
        } else {
            Err(RequestError::bad_request(
                "Either radius or bbox parameter is required",
            ))
        }
    }

    pub async fn search_by_activity(
        &self,
        activity_id: Option<i64>,
    ) -> RequestResult<ActivitySearch> {
        let id = activity_id.ok_or_else(|| {
            ValidationErrors::single(
                "activity_id",
                "The activity id field is required.",
            )
        })?;
        let activity = self
            .database
            .activity(Id::new(id))
            .await?
            .ok_or_else(|| {
                RequestError::Validation(ValidationErrors::single(
                    "activity_id",
                    "The selected activity id is invalid.",
                ))
            })?;
        let included_activity_ids = self.closure_from(activity.id).await?;
        let organizations = self
            .database
            .organizations_by_activities(&included_activity_ids)
            .await?;
        Ok(ActivitySearch {
            activity,
            included_activity_ids,
            organizations,
        })
    }

    pub async fn search_by_name(
        &self,
        name: Option<String>,
    ) -> RequestResult<NameSearch> {
        let name = name.ok_or_else(|| {
            ValidationErrors::single("name", "The name field is required.")
        })?;
        if name.chars().count() < 2 {
            return Err(ValidationErrors::single(
                "name",
                "The name field must be at least 2 characters.",
            )
            .into());
        }
        let organizations = self.database.organizations_by_name(&name).await?;
        Ok(NameSearch {
            query: name,
            organizations,
        })
    }

    /// The activity itself plus every activity reachable over child edges,
    /// each id at most once. Fails with `NotFound` for an unknown root.
    pub async fn descendant_closure(
        &self,
        root: Id<Activity>,
    ) -> RequestResult<Vec<Id<Activity>>> {
        self.database
            .activity(root)
            .await?
            .ok_or(RequestError::not_found("Activity"))?;
        self.closure_from(root).await
    }

    /// Breadth-first over the parent→children adjacency, one batched store
    /// call per level, unbounded depth. The visited set tolerates cyclic
    /// edges a corrupted store might contain.
    async fn closure_from(
        &self,
        root: Id<Activity>,
    ) -> RequestResult<Vec<Id<Activity>>> {
        let mut closure = vec![root];
        let mut visited: HashSet<Id<Activity>> = HashSet::from([root]);
        let mut frontier = vec![root];

        while !frontier.is_empty() {
            let children = self.database.activity_children(&frontier).await?;
            frontier = children
                .into_iter()
                .filter(|child| visited.insert(*child))
                .collect();
            closure.extend(frontier.iter().copied());
        }

        Ok(closure)
    }
}

fn require_number(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> f64 {
    match value {
        None => {
            errors.add(field, format!("The {} field is required.", field));
            f64::NAN
        }
        Some(raw) => match raw.parse() {
            Ok(number) => number,
            Err(_) => {
                errors
                    .add(field, format!("The {} field must be a number.", field));
                f64::NAN
            }
        },
    }
}

fn optional_number(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<f64> {
    match value {
        None => None,
        Some(raw) => match raw.parse() {
            Ok(number) => Some(number),
            Err(_) => {
                errors
                    .add(field, format!("The {} field must be a number.", field));
                None
            }
        },
    }
}
