use bigdecimal::BigDecimal;
use log::{debug, info};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, OrderDraft, OrderView};
use crate::domain::ports::{OrderRepository, PricingSource};
use crate::domain::pricing::{compute_totals, OrderTotals, PricingInput};

pub const MAX_PAGE_SIZE: i64 = 100;

pub struct OrderService<R, P> {
    repo: R,
    pricing: P,
    default_service_fee: Option<BigDecimal>,
}

impl<R: OrderRepository, P: PricingSource> OrderService<R, P> {
    pub fn new(repo: R, pricing: P, default_service_fee: Option<BigDecimal>) -> Self {
        Self {
            repo,
            pricing,
            default_service_fee,
        }
    }

    /// Stored setting first, then the configured default, then zero.
    fn resolve_service_fee(&self) -> Result<BigDecimal, DomainError> {
        if let Some(fee) = self.pricing.service_fee()? {
            return Ok(fee);
        }
        debug!("no stored service fee, falling back to configured default");
        match &self.default_service_fee {
            Some(fee) => Ok(fee.clone()),
            None => {
                debug!("no configured service fee, using 0");
                Ok(BigDecimal::default())
            }
        }
    }

    fn price(&self, draft: &OrderDraft) -> Result<OrderTotals, DomainError> {
        draft.validate()?;

        let shop = match draft.shop_id {
            Some(id) => Some(
                self.pricing
                    .find_shop(id)?
                    .ok_or_else(|| DomainError::invalid(format!("unknown shop {}", id)))?,
            ),
            None => None,
        };

        let coupon = match draft.coupon_code() {
            Some(code) => {
                let coupon = self.pricing.find_coupon(code)?;
                if coupon.is_none() {
                    debug!("coupon '{}' did not resolve, no coupon discount applied", code);
                }
                coupon
            }
            None => None,
        };

        let service_fee = self.resolve_service_fee()?;
        let items = draft.line_items();

        let totals = compute_totals(&PricingInput {
            items: &items,
            shop: shop.as_ref(),
            coupon: coupon.as_ref(),
            service_fee: Some(&service_fee),
            delivery_fee: draft.delivery_fee.as_ref(),
        })
        .rounded();
        totals.check_storable()?;
        Ok(totals)
    }

    pub fn quote(&self, draft: &OrderDraft) -> Result<OrderTotals, DomainError> {
        self.price(draft)
    }

    pub fn create_order(&self, draft: &OrderDraft) -> Result<(Uuid, OrderTotals), DomainError> {
        let totals = self.price(draft)?;
        let id = self.repo.create(draft, &totals)?;
        info!("created order {} total={}", id, totals.total_price);
        Ok((id, totals))
    }

    pub fn update_order(&self, id: Uuid, draft: &OrderDraft) -> Result<OrderTotals, DomainError> {
        let totals = self.price(draft)?;
        self.repo.update(id, draft, &totals)?;
        info!("repriced order {} total={}", id, totals.total_price);
        Ok(totals)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.repo.list(page.max(1), limit.clamp(1, MAX_PAGE_SIZE))
    }
}
