use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{OrderDraft, OrderLineInput, OrderView};
use crate::domain::pricing::OrderTotals;
use crate::errors::AppError;
use crate::state::AppState;

use super::{money, parse_decimal, parse_optional_decimal};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    /// Per-item discount, decimal string
    pub discount: Option<String>,
}

/// Order inputs. Totals are always computed server-side.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderRequest {
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub coupon_code: Option<String>,
    pub delivery_fee: Option<String>,
    pub lines: Vec<OrderLineRequest>,
}

impl OrderRequest {
    fn into_draft(self) -> Result<OrderDraft, AppError> {
        let lines = self
            .lines
            .into_iter()
            .map(|l| {
                Ok(OrderLineInput {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: parse_decimal("unit_price", &l.unit_price)?,
                    discount: parse_optional_decimal("discount", l.discount.as_deref())?,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(OrderDraft {
            customer_id: self.customer_id,
            shop_id: self.shop_id,
            coupon_code: self.coupon_code,
            delivery_fee: parse_optional_decimal("delivery_fee", self.delivery_fee.as_deref())?,
            lines,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotalsResponse {
    pub total_price: String,
    pub tax: String,
    pub total_discount: String,
    pub service_fee: String,
    /// Platform commission; not included in `total_price`.
    pub commission_fee: String,
}

impl From<&OrderTotals> for TotalsResponse {
    fn from(t: &OrderTotals) -> Self {
        Self {
            total_price: money(&t.total_price),
            tax: money(&t.tax),
            total_discount: money(&t.total_discount),
            service_fee: money(&t.service_fee),
            commission_fee: money(&t.commission_fee),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: Uuid,
    pub totals: TotalsResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: String,
    pub discount: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub coupon_code: Option<String>,
    pub delivery_fee: Option<String>,
    pub totals: TotalsResponse,
    pub created_at: String,
    pub updated_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            totals: TotalsResponse::from(&o.totals),
            id: o.id,
            customer_id: o.customer_id,
            shop_id: o.shop_id,
            coupon_code: o.coupon_code,
            delivery_fee: o.delivery_fee.as_ref().map(money),
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
            lines: o
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    id: l.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: money(&l.unit_price),
                    discount: l.discount.as_ref().map(money),
                })
                .collect(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Prices and stores a new order. The order, its items and an `OrderCreated`
/// outbox event are written in one transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponse),
        (status = 400, description = "Invalid order input or unknown shop"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft()?;

    let (id, totals) = web::block(move || state.orders.create_order(&draft)).await??;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        id,
        totals: TotalsResponse::from(&totals),
    }))
}

/// POST /orders/quote
///
/// Computes totals for the given inputs without storing anything.
#[utoipa::path(
    post,
    path = "/orders/quote",
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Computed totals", body = TotalsResponse),
        (status = 400, description = "Invalid order input or unknown shop"),
    ),
    tag = "orders"
)]
pub async fn quote_order(
    state: web::Data<AppState>,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft()?;

    let totals = web::block(move || state.orders.quote(&draft)).await??;

    Ok(HttpResponse::Ok().json(TotalsResponse::from(&totals)))
}

/// PUT /orders/{id}
///
/// Replaces the order's inputs and recomputes its totals.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order repriced", body = TotalsResponse),
        (status = 400, description = "Invalid order input or unknown shop"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let draft = body.into_inner().into_draft()?;

    let totals = web::block(move || state.orders.update_order(order_id, &draft)).await??;

    Ok(HttpResponse::Ok().json(TotalsResponse::from(&totals)))
}

/// GET /orders/{id}
///
/// Returns the order together with its items and stored totals.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || state.orders.get_order(order_id)).await??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound("Order")),
    }
}

/// GET /orders
///
/// Returns a paginated list of orders (without their items), newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, crate::application::order_service::MAX_PAGE_SIZE);

    let result = web::block(move || state.orders.list_orders(page, limit)).await??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}
