use utoipa::OpenApi;

use crate::handlers::{catalog, delivery_points, orders};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace service",
        description = "Order pricing, catalog settings and nearest delivery point search"
    ),
    paths(
        orders::create_order,
        orders::quote_order,
        orders::update_order,
        orders::get_order,
        orders::list_orders,
        catalog::create_shop,
        catalog::get_shop,
        catalog::set_default_shop,
        catalog::create_coupon,
        catalog::get_service_fee,
        catalog::set_service_fee,
        delivery_points::create_delivery_point,
        delivery_points::set_delivery_point_active,
        delivery_points::nearest_delivery_points,
    ),
    tags(
        (name = "orders", description = "Order pricing and storage"),
        (name = "catalog", description = "Shops, coupons and platform settings"),
        (name = "delivery", description = "Delivery points and proximity search"),
    )
)]
pub struct ApiDoc;
