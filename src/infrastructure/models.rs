use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::catalog::{Coupon, Shop};
use crate::domain::errors::DomainError;
use crate::domain::geo::DeliveryPoint;
use crate::domain::pricing::OrderTotals;
use crate::schema::{
    coupons, delivery_points, order_items, order_outbox, orders, platform_settings, shops,
};

// ── Orders ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub coupon_code: Option<String>,
    pub delivery_fee: Option<BigDecimal>,
    pub total_price: BigDecimal,
    pub tax: BigDecimal,
    pub total_discount: BigDecimal,
    pub service_fee: BigDecimal,
    pub commission_fee: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            total_price: self.total_price.clone(),
            tax: self.tax.clone(),
            total_discount: self.total_discount.clone(),
            service_fee: self.service_fee.clone(),
            commission_fee: self.commission_fee.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub coupon_code: Option<String>,
    pub delivery_fee: Option<BigDecimal>,
    pub total_price: BigDecimal,
    pub tax: BigDecimal,
    pub total_discount: BigDecimal,
    pub service_fee: BigDecimal,
    pub commission_fee: BigDecimal,
}

/// Full replacement of an order's inputs; `None` clears the column.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(treat_none_as_null = true)]
pub struct OrderChangeset {
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub coupon_code: Option<String>,
    pub delivery_fee: Option<BigDecimal>,
    pub total_price: BigDecimal,
    pub tax: BigDecimal,
    pub total_discount: BigDecimal,
    pub service_fee: BigDecimal,
    pub commission_fee: BigDecimal,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub discount: Option<BigDecimal>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub discount: Option<BigDecimal>,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_outbox)]
pub struct NewOutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = shops)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShopRow {
    pub id: Uuid,
    pub name: String,
    pub tax_pct: Option<BigDecimal>,
    pub commission_pct: Option<BigDecimal>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ShopRow> for Shop {
    fn from(row: ShopRow) -> Self {
        Shop {
            id: row.id,
            name: row.name,
            tax_pct: row.tax_pct,
            commission_pct: row.commission_pct,
            is_default: row.is_default,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = shops)]
pub struct NewShopRow {
    pub id: Uuid,
    pub name: String,
    pub tax_pct: Option<BigDecimal>,
    pub commission_pct: Option<BigDecimal>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = coupons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CouponRow {
    pub id: Uuid,
    pub code: String,
    pub discount_type: String,
    pub discount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = DomainError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let discount_type = row.discount_type.parse().map_err(|_| {
            DomainError::Internal(format!(
                "coupon {} has unknown discount type '{}'",
                row.id, row.discount_type
            ))
        })?;
        Ok(Coupon {
            id: row.id,
            code: row.code,
            discount_type,
            discount: row.discount,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = coupons)]
pub struct NewCouponRow {
    pub id: Uuid,
    pub code: String,
    pub discount_type: String,
    pub discount: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = platform_settings)]
pub struct PlatformSettingsRow {
    pub id: i16,
    pub service_fee: Option<BigDecimal>,
    pub updated_at: DateTime<Utc>,
}

// ── Delivery points ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = delivery_points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryPointRow {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub active: bool,
    pub address: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DeliveryPointRow> for DeliveryPoint {
    fn from(row: DeliveryPointRow) -> Self {
        DeliveryPoint {
            id: row.id,
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            active: row.active,
            address: row.address,
            image: row.image,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = delivery_points)]
pub struct NewDeliveryPointRow {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub active: bool,
    pub address: Option<String>,
    pub image: Option<String>,
}
