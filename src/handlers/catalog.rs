use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::{DiscountType, NewCoupon, NewShop, Shop};
use crate::errors::AppError;
use crate::state::AppState;

use super::{money, parse_decimal, parse_optional_decimal, CreatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShopRequest {
    pub name: String,
    /// Percentage 0-100 as a decimal string
    pub tax_pct: Option<String>,
    /// Percentage 0-100 as a decimal string
    pub commission_pct: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShopResponse {
    pub id: Uuid,
    pub name: String,
    pub tax_pct: Option<String>,
    pub commission_pct: Option<String>,
    pub is_default: bool,
}

impl From<Shop> for ShopResponse {
    fn from(s: Shop) -> Self {
        Self {
            id: s.id,
            name: s.name,
            tax_pct: s.tax_pct.as_ref().map(money),
            commission_pct: s.commission_pct.as_ref().map(money),
            is_default: s.is_default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountTypeDto {
    Percentage,
    Fixed,
}

impl From<DiscountTypeDto> for DiscountType {
    fn from(t: DiscountTypeDto) -> Self {
        match t {
            DiscountTypeDto::Percentage => DiscountType::Percentage,
            DiscountTypeDto::Fixed => DiscountType::Fixed,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_type: DiscountTypeDto,
    /// Percentage (0-100) or flat amount, decimal string
    pub discount: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ServiceFee {
    /// Flat fee added to every order, decimal string. `null` when unset.
    pub service_fee: Option<String>,
}

/// POST /shops
#[utoipa::path(
    post,
    path = "/shops",
    request_body = CreateShopRequest,
    responses(
        (status = 201, description = "Shop created", body = CreatedResponse),
        (status = 400, description = "Invalid shop"),
    ),
    tag = "catalog"
)]
pub async fn create_shop(
    state: web::Data<AppState>,
    body: web::Json<CreateShopRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let shop = NewShop {
        name: body.name,
        tax_pct: parse_optional_decimal("tax_pct", body.tax_pct.as_deref())?,
        commission_pct: parse_optional_decimal("commission_pct", body.commission_pct.as_deref())?,
        is_default: body.is_default,
    };

    let id = web::block(move || state.catalog.create_shop(&shop)).await??;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// GET /shops/{id}
#[utoipa::path(
    get,
    path = "/shops/{id}",
    params(
        ("id" = Uuid, Path, description = "Shop UUID"),
    ),
    responses(
        (status = 200, description = "Shop found", body = ShopResponse),
        (status = 404, description = "Shop not found"),
    ),
    tag = "catalog"
)]
pub async fn get_shop(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let shop_id = path.into_inner();

    let shop = web::block(move || state.catalog.get_shop(shop_id)).await??;

    match shop {
        Some(shop) => Ok(HttpResponse::Ok().json(ShopResponse::from(shop))),
        None => Err(AppError::NotFound("Shop")),
    }
}

/// POST /shops/{id}/default
///
/// Makes this shop the single default shop.
#[utoipa::path(
    post,
    path = "/shops/{id}/default",
    params(
        ("id" = Uuid, Path, description = "Shop UUID"),
    ),
    responses(
        (status = 204, description = "Default shop updated"),
        (status = 404, description = "Shop not found"),
    ),
    tag = "catalog"
)]
pub async fn set_default_shop(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let shop_id = path.into_inner();

    web::block(move || state.catalog.set_default_shop(shop_id)).await??;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /coupons
#[utoipa::path(
    post,
    path = "/coupons",
    request_body = CreateCouponRequest,
    responses(
        (status = 201, description = "Coupon created", body = CreatedResponse),
        (status = 400, description = "Invalid coupon"),
        (status = 409, description = "Coupon code already exists"),
    ),
    tag = "catalog"
)]
pub async fn create_coupon(
    state: web::Data<AppState>,
    body: web::Json<CreateCouponRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let coupon = NewCoupon {
        code: body.code,
        discount_type: body.discount_type.into(),
        discount: parse_decimal("discount", &body.discount)?,
    };

    let id = web::block(move || state.catalog.create_coupon(&coupon)).await??;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// GET /settings/service-fee
#[utoipa::path(
    get,
    path = "/settings/service-fee",
    responses(
        (status = 200, description = "Stored service fee", body = ServiceFee),
    ),
    tag = "catalog"
)]
pub async fn get_service_fee(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let fee = web::block(move || state.catalog.get_service_fee()).await??;

    Ok(HttpResponse::Ok().json(ServiceFee {
        service_fee: fee.as_ref().map(money),
    }))
}

/// PUT /settings/service-fee
#[utoipa::path(
    put,
    path = "/settings/service-fee",
    request_body = ServiceFee,
    responses(
        (status = 200, description = "Service fee stored", body = ServiceFee),
        (status = 400, description = "Missing, malformed or negative fee"),
    ),
    tag = "catalog"
)]
pub async fn set_service_fee(
    state: web::Data<AppState>,
    body: web::Json<ServiceFee>,
) -> Result<HttpResponse, AppError> {
    let raw = body
        .into_inner()
        .service_fee
        .ok_or_else(|| AppError::BadRequest("service_fee is required".to_string()))?;
    let fee = parse_decimal("service_fee", &raw)?;
    let stored = money(&fee);

    web::block(move || state.catalog.set_service_fee(&fee)).await??;

    Ok(HttpResponse::Ok().json(ServiceFee {
        service_fee: Some(stored),
    }))
}
