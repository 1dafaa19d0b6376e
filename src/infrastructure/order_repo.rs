use chrono::Utc;
use diesel::prelude::*;
use serde_json::json;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, OrderDraft, OrderLineView, OrderView};
use crate::domain::ports::OrderRepository;
use crate::domain::pricing::OrderTotals;
use crate::schema::{order_items, order_outbox, orders};

use super::models::{
    NewOrderItemRow, NewOrderRow, NewOutboxEventRow, OrderChangeset, OrderItemRow, OrderRow,
};

pub const EVENT_ORDER_CREATED: &str = "OrderCreated";
pub const EVENT_ORDER_REPRICED: &str = "OrderRepriced";

fn item_rows(order_id: Uuid, draft: &OrderDraft) -> Vec<NewOrderItemRow> {
    draft
        .lines
        .iter()
        .enumerate()
        .map(|(position, l)| NewOrderItemRow {
            id: Uuid::new_v4(),
            order_id,
            product_id: l.product_id,
            quantity: l.quantity,
            unit_price: l.unit_price.clone(),
            discount: l.discount.clone(),
            position: position as i32,
        })
        .collect()
}

/// Outbox event for downstream consumers (notifications, seller payouts).
/// Written in the same transaction as the order itself.
fn outbox_event(
    order_id: Uuid,
    event_type: &str,
    draft: &OrderDraft,
    totals: &OrderTotals,
) -> NewOutboxEventRow {
    let line_payloads: Vec<serde_json::Value> = draft
        .lines
        .iter()
        .map(|l| {
            json!({
                "product_id": l.product_id,
                "quantity": l.quantity,
                "unit_price": l.unit_price.to_string(),
                "discount": l.discount.as_ref().map(|d| d.to_string()),
            })
        })
        .collect();

    NewOutboxEventRow {
        id: Uuid::new_v4(),
        aggregate_type: "Order".to_string(),
        aggregate_id: order_id.to_string(),
        event_type: event_type.to_string(),
        payload: json!({
            "order_id": order_id,
            "customer_id": draft.customer_id,
            "shop_id": draft.shop_id,
            "coupon_code": draft.coupon_code(),
            "lines": line_payloads,
            "total_price": totals.total_price.to_string(),
            "tax": totals.tax.to_string(),
            "total_discount": totals.total_discount.to_string(),
            "service_fee": totals.service_fee.to_string(),
            "commission_fee": totals.commission_fee.to_string(),
        }),
    }
}

fn into_view(order: OrderRow, lines: Vec<OrderItemRow>) -> OrderView {
    OrderView {
        totals: order.totals(),
        id: order.id,
        customer_id: order.customer_id,
        shop_id: order.shop_id,
        coupon_code: order.coupon_code,
        delivery_fee: order.delivery_fee,
        created_at: order.created_at,
        updated_at: order.updated_at,
        lines: lines
            .into_iter()
            .map(|l| OrderLineView {
                id: l.id,
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
                discount: l.discount,
            })
            .collect(),
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, draft: &OrderDraft, totals: &OrderTotals) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    customer_id: draft.customer_id,
                    shop_id: draft.shop_id,
                    coupon_code: draft.coupon_code().map(str::to_string),
                    delivery_fee: draft.delivery_fee.clone(),
                    total_price: totals.total_price.clone(),
                    tax: totals.tax.clone(),
                    total_discount: totals.total_discount.clone(),
                    service_fee: totals.service_fee.clone(),
                    commission_fee: totals.commission_fee.clone(),
                })
                .execute(conn)?;

            let items = item_rows(order_id, draft);
            if !items.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&items)
                    .execute(conn)?;
            }

            diesel::insert_into(order_outbox::table)
                .values(&outbox_event(order_id, EVENT_ORDER_CREATED, draft, totals))
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn update(&self, id: Uuid, draft: &OrderDraft, totals: &OrderTotals) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(orders::table.filter(orders::id.eq(id)))
                .set(&OrderChangeset {
                    customer_id: draft.customer_id,
                    shop_id: draft.shop_id,
                    coupon_code: draft.coupon_code().map(str::to_string),
                    delivery_fee: draft.delivery_fee.clone(),
                    total_price: totals.total_price.clone(),
                    tax: totals.tax.clone(),
                    total_discount: totals.total_discount.clone(),
                    service_fee: totals.service_fee.clone(),
                    commission_fee: totals.commission_fee.clone(),
                    updated_at: Utc::now(),
                })
                .execute(conn)?;
            if updated == 0 {
                return Err(DomainError::NotFound("Order"));
            }

            diesel::delete(order_items::table.filter(order_items::order_id.eq(id)))
                .execute(conn)?;
            let items = item_rows(id, draft);
            if !items.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&items)
                    .execute(conn)?;
            }

            diesel::insert_into(order_outbox::table)
                .values(&outbox_event(id, EVENT_ORDER_REPRICED, draft, totals))
                .execute(conn)?;

            Ok(())
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::position.asc())
            .load(&mut conn)?;

        Ok(Some(into_view(order, lines)))
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows.into_iter().map(|o| into_view(o, vec![])).collect(),
                total,
            })
        })
    }
}
