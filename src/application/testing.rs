//! In-memory port implementations for service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::catalog::{Coupon, NewCoupon, NewShop, Shop};
use crate::domain::errors::DomainError;
use crate::domain::geo::{BoundingBox, DeliveryPoint, NewDeliveryPoint};
use crate::domain::order::{ListResult, OrderDraft, OrderLineView, OrderView};
use crate::domain::ports::{
    CatalogRepository, DeliveryPointRepository, OrderRepository, PricingSource,
};
use crate::domain::pricing::OrderTotals;

fn view(id: Uuid, draft: &OrderDraft, totals: &OrderTotals) -> OrderView {
    let now = Utc::now();
    OrderView {
        id,
        customer_id: draft.customer_id,
        shop_id: draft.shop_id,
        coupon_code: draft.coupon_code().map(str::to_string),
        delivery_fee: draft.delivery_fee.clone(),
        totals: totals.clone(),
        created_at: now,
        updated_at: now,
        lines: draft
            .lines
            .iter()
            .map(|l| OrderLineView {
                id: Uuid::new_v4(),
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price.clone(),
                discount: l.discount.clone(),
            })
            .collect(),
    }
}

#[derive(Clone, Default)]
pub struct InMemoryOrders {
    orders: Arc<Mutex<Vec<OrderView>>>,
}

impl OrderRepository for InMemoryOrders {
    fn create(&self, draft: &OrderDraft, totals: &OrderTotals) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        self.orders.lock().unwrap().push(view(id, draft, totals));
        Ok(id)
    }

    fn update(&self, id: Uuid, draft: &OrderDraft, totals: &OrderTotals) -> Result<(), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let slot = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(DomainError::NotFound("Order"))?;
        let created_at = slot.created_at;
        *slot = view(id, draft, totals);
        slot.created_at = created_at;
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let orders = self.orders.lock().unwrap();
        let items = orders
            .iter()
            .rev()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(ListResult {
            items,
            total: orders.len() as i64,
        })
    }
}

#[derive(Default)]
struct CatalogState {
    shops: Vec<Shop>,
    coupons: HashMap<String, Coupon>,
    service_fee: Option<BigDecimal>,
}

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn shops(&self) -> Vec<Shop> {
        self.state.lock().unwrap().shops.clone()
    }
}

impl PricingSource for InMemoryCatalog {
    fn find_shop(&self, id: Uuid) -> Result<Option<Shop>, DomainError> {
        Ok(self.state.lock().unwrap().shops.iter().find(|s| s.id == id).cloned())
    }

    fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, DomainError> {
        Ok(self.state.lock().unwrap().coupons.get(code).cloned())
    }

    fn service_fee(&self) -> Result<Option<BigDecimal>, DomainError> {
        Ok(self.state.lock().unwrap().service_fee.clone())
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn create_shop(&self, shop: &NewShop) -> Result<Uuid, DomainError> {
        let mut state = self.state.lock().unwrap();
        if shop.is_default {
            state.shops.iter_mut().for_each(|s| s.is_default = false);
        }
        let id = Uuid::new_v4();
        state.shops.push(Shop {
            id,
            name: shop.name.clone(),
            tax_pct: shop.tax_pct.clone(),
            commission_pct: shop.commission_pct.clone(),
            is_default: shop.is_default,
        });
        Ok(id)
    }

    fn set_default_shop(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if !state.shops.iter().any(|s| s.id == id) {
            return Err(DomainError::NotFound("Shop"));
        }
        state.shops.iter_mut().for_each(|s| s.is_default = s.id == id);
        Ok(())
    }

    fn create_coupon(&self, coupon: &NewCoupon) -> Result<Uuid, DomainError> {
        let mut state = self.state.lock().unwrap();
        if state.coupons.contains_key(&coupon.code) {
            return Err(DomainError::Conflict(format!(
                "coupon '{}' already exists",
                coupon.code
            )));
        }
        let id = Uuid::new_v4();
        state.coupons.insert(
            coupon.code.clone(),
            Coupon {
                id,
                code: coupon.code.clone(),
                discount_type: coupon.discount_type,
                discount: coupon.discount.clone(),
            },
        );
        Ok(id)
    }

    fn set_service_fee(&self, fee: &BigDecimal) -> Result<(), DomainError> {
        self.state.lock().unwrap().service_fee = Some(fee.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryDeliveryPoints {
    points: Arc<Mutex<Vec<DeliveryPoint>>>,
}

impl DeliveryPointRepository for InMemoryDeliveryPoints {
    fn create(&self, point: &NewDeliveryPoint) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        self.points.lock().unwrap().push(DeliveryPoint {
            id,
            name: point.name.clone(),
            latitude: point.latitude,
            longitude: point.longitude,
            active: point.active,
            address: point.address.clone(),
            image: point.image.clone(),
        });
        Ok(id)
    }

    fn set_active(&self, id: Uuid, active: bool) -> Result<(), DomainError> {
        let mut points = self.points.lock().unwrap();
        let point = points
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::NotFound("Delivery point"))?;
        point.active = active;
        Ok(())
    }

    fn active_within(&self, bbox: &BoundingBox) -> Result<Vec<DeliveryPoint>, DomainError> {
        Ok(self
            .points
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.active && bbox.contains(p.latitude, p.longitude))
            .cloned()
            .collect())
    }
}
