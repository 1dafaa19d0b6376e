use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::geo::{NearbyPoint, NewDeliveryPoint, ProximityQuery};
use crate::errors::AppError;
use crate::state::AppState;

use super::CreatedResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDeliveryPointRequest {
    pub name: String,
    /// WGS-84 degrees
    pub latitude: f64,
    /// WGS-84 degrees
    pub longitude: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    pub address: Option<String>,
    pub image: Option<String>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// Raw query values; parsed and validated by `ProximityQuery::parse`.
#[derive(Debug, Deserialize)]
pub struct NearestParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub radius: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyPointResponse {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub image: Option<String>,
    pub distance_km: f64,
}

impl From<NearbyPoint> for NearbyPointResponse {
    fn from(n: NearbyPoint) -> Self {
        Self {
            id: n.point.id,
            name: n.point.name,
            latitude: n.point.latitude,
            longitude: n.point.longitude,
            address: n.point.address,
            image: n.point.image,
            distance_km: n.distance_km,
        }
    }
}

/// POST /delivery-points
#[utoipa::path(
    post,
    path = "/delivery-points",
    request_body = CreateDeliveryPointRequest,
    responses(
        (status = 201, description = "Delivery point created", body = CreatedResponse),
        (status = 400, description = "Invalid coordinates or name"),
    ),
    tag = "delivery"
)]
pub async fn create_delivery_point(
    state: web::Data<AppState>,
    body: web::Json<CreateDeliveryPointRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let point = NewDeliveryPoint {
        name: body.name,
        latitude: body.latitude,
        longitude: body.longitude,
        active: body.active,
        address: body.address,
        image: body.image,
    };

    let id = web::block(move || state.proximity.create_delivery_point(&point)).await??;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// PUT /delivery-points/{id}/active
#[utoipa::path(
    put,
    path = "/delivery-points/{id}/active",
    params(
        ("id" = Uuid, Path, description = "Delivery point UUID"),
    ),
    request_body = SetActiveRequest,
    responses(
        (status = 204, description = "Flag updated"),
        (status = 404, description = "Delivery point not found"),
    ),
    tag = "delivery"
)]
pub async fn set_delivery_point_active(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SetActiveRequest>,
) -> Result<HttpResponse, AppError> {
    let point_id = path.into_inner();
    let active = body.into_inner().active;

    web::block(move || state.proximity.set_active(point_id, active)).await??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /delivery-points/nearest
///
/// Active delivery points within `radius` km of (`lat`, `lon`), nearest first.
#[utoipa::path(
    get,
    path = "/delivery-points/nearest",
    params(
        ("lat" = String, Query, description = "Latitude in degrees"),
        ("lon" = String, Query, description = "Longitude in degrees"),
        ("radius" = Option<String>, Query, description = "Search radius in km (default 20)"),
        ("limit" = Option<String>, Query, description = "Maximum results (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Nearby points, possibly empty", body = [NearbyPointResponse]),
        (status = 400, description = "Missing or malformed coordinates, radius or limit"),
    ),
    tag = "delivery"
)]
pub async fn nearest_delivery_points(
    state: web::Data<AppState>,
    query: web::Query<NearestParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let query = ProximityQuery::parse(
        params.lat.as_deref(),
        params.lon.as_deref(),
        params.radius.as_deref(),
        params.limit.as_deref(),
    )?;

    let nearby = web::block(move || state.proximity.find_nearest(&query)).await??;

    let body: Vec<NearbyPointResponse> = nearby.into_iter().map(NearbyPointResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
