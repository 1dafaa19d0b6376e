use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::catalog::{Coupon, NewCoupon, NewShop, Shop};
use super::errors::DomainError;
use super::geo::{BoundingBox, DeliveryPoint, NewDeliveryPoint};
use super::order::{ListResult, OrderDraft, OrderView};
use super::pricing::OrderTotals;

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, draft: &OrderDraft, totals: &OrderTotals) -> Result<Uuid, DomainError>;
    /// Replace the order's inputs and totals. `NotFound` when `id` is unknown.
    fn update(&self, id: Uuid, draft: &OrderDraft, totals: &OrderTotals)
        -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
}

/// Read side used while pricing an order.
pub trait PricingSource: Send + Sync + 'static {
    fn find_shop(&self, id: Uuid) -> Result<Option<Shop>, DomainError>;
    fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, DomainError>;
    fn service_fee(&self) -> Result<Option<BigDecimal>, DomainError>;
}

pub trait CatalogRepository: PricingSource {
    /// Inserts the shop; when it is flagged default, the flag is cleared on
    /// every other shop in the same transaction.
    fn create_shop(&self, shop: &NewShop) -> Result<Uuid, DomainError>;
    fn set_default_shop(&self, id: Uuid) -> Result<(), DomainError>;
    fn create_coupon(&self, coupon: &NewCoupon) -> Result<Uuid, DomainError>;
    fn set_service_fee(&self, fee: &BigDecimal) -> Result<(), DomainError>;
}

pub trait DeliveryPointRepository: Send + Sync + 'static {
    fn create(&self, point: &NewDeliveryPoint) -> Result<Uuid, DomainError>;
    fn set_active(&self, id: Uuid, active: bool) -> Result<(), DomainError>;
    /// Active points inside `bbox`. May over-select; never under-selects.
    fn active_within(&self, bbox: &BoundingBox) -> Result<Vec<DeliveryPoint>, DomainError>;
}
