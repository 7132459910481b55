use axum::{
    extract::{Path, Query, State},
    routing::{get, on},
    Json, Router,
};
use directory::client::NearbyParams;
use model::{
    activity::Activity,
    building::Building,
    organization::{Organization, OrganizationRecord},
    WithId,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{
    common::{route_not_found, schema, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<OrganizationDto>))
        .route("/by-building/:building_id", get(by_building))
        .route("/by-activity/:activity_id", get(by_activity))
        .route("/nearby", get(nearby))
        .route("/search/activity", get(search_by_activity))
        .route("/search/name", get(search_by_name))
        .route("/:id", get(show))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn by_building(
    Path(building_id): Path<i64>,
    State(WebState { directory_client }): State<WebState>,
) -> RouteResult<ByBuildingResponse> {
    let (building, organizations) = directory_client
        .organizations_by_building(Id::new(building_id))
        .await?;
    let organizations = organization_dtos(
        organizations,
        &DtoFields {
            coordinates: true,
            activity_level: true,
            activity_parent: false,
        },
    );
    Ok(Json(ByBuildingResponse {
        building: BuildingSummaryDto {
            id: building.id,
            address: building.content.address,
        },
        count: organizations.len(),
        organizations,
    }))
}

async fn by_activity(
    Path(activity_id): Path<i64>,
    State(WebState { directory_client }): State<WebState>,
) -> RouteResult<ByActivityResponse> {
    let (activity, organizations) = directory_client
        .organizations_by_activity(Id::new(activity_id))
        .await?;
    let organizations = organization_dtos(
        organizations,
        &DtoFields {
            coordinates: false,
            activity_level: false,
            activity_parent: false,
        },
    );
    Ok(Json(ByActivityResponse {
        activity: ActivitySummaryDto {
            id: activity.id,
            name: activity.content.name,
        },
        count: organizations.len(),
        organizations,
    }))
}

async fn nearby(
    Query(params): Query<NearbyParams>,
    State(WebState { directory_client }): State<WebState>,
) -> RouteResult<NearbyResponse> {
    let search = directory_client.organizations_nearby(params).await?;
    let organizations = organization_dtos(
        search.organizations,
        &DtoFields {
            coordinates: true,
            activity_level: false,
            activity_parent: false,
        },
    );
    Ok(Json(NearbyResponse {
        center: CoordinatesDto {
            lat: search.center.lat,
            lng: search.center.lng,
        },
        radius: search.radius,
        bbox: search.bbox,
        count: organizations.len(),
        organizations,
    }))
}

async fn show(
    Path(id): Path<i64>,
    State(WebState { directory_client }): State<WebState>,
) -> RouteResult<OrganizationDto> {
    let record = directory_client.organization_by_id(Id::new(id)).await?;
    Ok(Json(organization_dto(
        record,
        &DtoFields {
            coordinates: true,
            activity_level: true,
            activity_parent: true,
        },
    )))
}

#[derive(Debug, Deserialize)]
struct ActivitySearchQuery {
    activity_id: Option<i64>,
}

async fn search_by_activity(
    Query(query): Query<ActivitySearchQuery>,
    State(WebState { directory_client }): State<WebState>,
) -> RouteResult<ActivitySearchResponse> {
    let search = directory_client
        .search_by_activity(query.activity_id)
        .await?;
    let organizations = organization_dtos(
        search.organizations,
        &DtoFields {
            coordinates: false,
            activity_level: true,
            activity_parent: false,
        },
    );
    Ok(Json(ActivitySearchResponse {
        search_activity: ActivitySummaryDto {
            id: search.activity.id,
            name: search.activity.content.name,
        },
        included_activity_ids: search.included_activity_ids,
        count: organizations.len(),
        organizations,
    }))
}

#[derive(Debug, Deserialize)]
struct NameSearchQuery {
    name: Option<String>,
}

async fn search_by_name(
    Query(query): Query<NameSearchQuery>,
    State(WebState { directory_client }): State<WebState>,
) -> RouteResult<NameSearchResponse> {
    let search = directory_client.search_by_name(query.name).await?;
    let organizations = organization_dtos(
        search.organizations,
        &DtoFields {
            coordinates: false,
            activity_level: false,
            activity_parent: false,
        },
    );
    Ok(Json(NameSearchResponse {
        search_query: search.query,
        count: organizations.len(),
        organizations,
    }))
}

// - Response shapes -

#[derive(Debug, Serialize, JsonSchema)]
struct ByBuildingResponse {
    building: BuildingSummaryDto,
    organizations: Vec<OrganizationDto>,
    count: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ByActivityResponse {
    activity: ActivitySummaryDto,
    organizations: Vec<OrganizationDto>,
    count: usize,
}

/// Mode fields are echoed as `null` when not selected, so this one does not
/// skip `None` values.
#[derive(Debug, Serialize, JsonSchema)]
struct NearbyResponse {
    center: CoordinatesDto,
    radius: Option<f64>,
    bbox: Option<String>,
    organizations: Vec<OrganizationDto>,
    count: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ActivitySearchResponse {
    search_activity: ActivitySummaryDto,
    included_activity_ids: Vec<Id<Activity>>,
    organizations: Vec<OrganizationDto>,
    count: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
struct NameSearchResponse {
    search_query: String,
    organizations: Vec<OrganizationDto>,
    count: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
struct BuildingSummaryDto {
    id: Id<Building>,
    address: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ActivitySummaryDto {
    id: Id<Activity>,
    name: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct CoordinatesDto {
    lat: f64,
    lng: f64,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, JsonSchema)]
struct BuildingDto {
    id: Id<Building>,
    address: String,
    coordinates: Option<CoordinatesDto>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, JsonSchema)]
struct ActivityDto {
    id: Id<Activity>,
    name: String,
    level: Option<i32>,
    /// Doubly optional: omitted unless the endpoint reports parentage, then
    /// `null` for root activities.
    parent_id: Option<Option<Id<Activity>>>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct OrganizationDto {
    id: Id<Organization>,
    name: String,
    phones: Vec<String>,
    building: BuildingDto,
    activities: Vec<ActivityDto>,
}

/// Which optional projection fields an endpoint reports.
struct DtoFields {
    coordinates: bool,
    activity_level: bool,
    activity_parent: bool,
}

fn organization_dtos(
    records: Vec<OrganizationRecord>,
    fields: &DtoFields,
) -> Vec<OrganizationDto> {
    records
        .into_iter()
        .map(|record| organization_dto(record, fields))
        .collect()
}

fn organization_dto(
    record: OrganizationRecord,
    fields: &DtoFields,
) -> OrganizationDto {
    let OrganizationRecord {
        organization,
        phones,
        building,
        activities,
    } = record;
    let Building { address, location } = building.content;

    OrganizationDto {
        id: organization.id,
        name: organization.content.name,
        phones,
        building: BuildingDto {
            id: building.id,
            address,
            coordinates: fields.coordinates.then_some(CoordinatesDto {
                lat: location.lat,
                lng: location.lng,
            }),
        },
        activities: activities
            .into_iter()
            .map(|WithId { id, content }| ActivityDto {
                id,
                name: content.name,
                level: fields.activity_level.then_some(content.level),
                parent_id: fields.activity_parent.then_some(content.parent_id),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use model::building::Coordinates;
    use serde_json::json;

    use super::*;

    fn record() -> OrganizationRecord {
        OrganizationRecord {
            organization: WithId::new(
                Id::new(5),
                Organization {
                    name: "Молоко и мясо".to_owned(),
                    building_id: Id::new(1),
                },
            ),
            phones: vec!["2-222-222".to_owned(), "8-923-666-13-13".to_owned()],
            building: WithId::new(
                Id::new(1),
                Building {
                    address: "г. Москва, ул. Ленина 1, офис 3".to_owned(),
                    location: Coordinates {
                        lat: 55.75,
                        lng: 37.62,
                    },
                },
            ),
            activities: vec![
                WithId::new(
                    Id::new(3),
                    Activity {
                        name: "Молочная продукция".to_owned(),
                        parent_id: Some(Id::new(2)),
                        level: 2,
                    },
                ),
                WithId::new(
                    Id::new(2),
                    Activity {
                        name: "Еда".to_owned(),
                        parent_id: None,
                        level: 1,
                    },
                ),
            ],
        }
    }

    #[test]
    fn full_projection_reports_every_field() {
        let dto = organization_dto(
            record(),
            &DtoFields {
                coordinates: true,
                activity_level: true,
                activity_parent: true,
            },
        );
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({
                "id": 5,
                "name": "Молоко и мясо",
                "phones": ["2-222-222", "8-923-666-13-13"],
                "building": {
                    "id": 1,
                    "address": "г. Москва, ул. Ленина 1, офис 3",
                    "coordinates": { "lat": 55.75, "lng": 37.62 }
                },
                "activities": [
                    { "id": 3, "name": "Молочная продукция", "level": 2, "parent_id": 2 },
                    { "id": 2, "name": "Еда", "level": 1, "parent_id": null }
                ]
            })
        );
    }

    #[test]
    fn summary_projection_leaves_the_optional_fields_out() {
        let dto = organization_dto(
            record(),
            &DtoFields {
                coordinates: false,
                activity_level: false,
                activity_parent: false,
            },
        );
        let value = serde_json::to_value(&dto).unwrap();
        assert!(value["building"].get("coordinates").is_none());
        assert!(value["activities"][0].get("level").is_none());
        assert!(value["activities"][0].get("parent_id").is_none());
    }

    #[test]
    fn nearby_response_echoes_absent_mode_fields_as_null() {
        let response = NearbyResponse {
            center: CoordinatesDto {
                lat: 55.75,
                lng: 37.62,
            },
            radius: None,
            bbox: Some("55.9,37.5,56.0,37.6".to_owned()),
            organizations: Vec::new(),
            count: 0,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "center": { "lat": 55.75, "lng": 37.62 },
                "radius": null,
                "bbox": "55.9,37.5,56.0,37.6",
                "organizations": [],
                "count": 0
            })
        );
    }

    #[test]
    fn search_response_lists_the_included_activity_ids() {
        let response = ActivitySearchResponse {
            search_activity: ActivitySummaryDto {
                id: Id::new(3),
                name: "Еда".to_owned(),
            },
            included_activity_ids: vec![Id::new(3), Id::new(8), Id::new(9)],
            organizations: Vec::new(),
            count: 0,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["included_activity_ids"], json!([3, 8, 9]));
        assert_eq!(value["search_activity"], json!({ "id": 3, "name": "Еда" }));
    }
}
