//! Order pricing.
//!
//! Totals are a pure function of the line items, the shop's rates, the
//! resolved coupon, the platform service fee and the delivery fee. Steps run
//! in a fixed order because the coupon and the commission compound on the
//! running total.

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use super::catalog::{Coupon, DiscountType, Shop};
use super::errors::DomainError;
use super::money::check_amount;

/// A single priced entry on an order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub discount: Option<BigDecimal>,
}

/// Everything the engine reads. `coupon` is `None` both when the order has no
/// code and when the code did not resolve.
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    pub items: &'a [LineItem],
    pub shop: Option<&'a Shop>,
    pub coupon: Option<&'a Coupon>,
    pub service_fee: Option<&'a BigDecimal>,
    pub delivery_fee: Option<&'a BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub total_price: BigDecimal,
    pub tax: BigDecimal,
    pub total_discount: BigDecimal,
    pub service_fee: BigDecimal,
    /// Reported to the caller, never subtracted from `total_price`.
    pub commission_fee: BigDecimal,
}

impl OrderTotals {
    /// Totals as stored: exactly two fractional digits.
    pub fn rounded(&self) -> Self {
        let cents = |v: &BigDecimal| v.round(2).with_scale(2);
        Self {
            total_price: cents(&self.total_price),
            tax: cents(&self.tax),
            total_discount: cents(&self.total_discount),
            service_fee: cents(&self.service_fee),
            commission_fee: cents(&self.commission_fee),
        }
    }

    /// Large quantities can push a total past what an order row holds even
    /// when every input fits.
    pub fn check_storable(&self) -> Result<(), DomainError> {
        check_amount("total_price", &self.total_price)?;
        check_amount("tax", &self.tax)?;
        check_amount("total_discount", &self.total_discount)?;
        check_amount("service_fee", &self.service_fee)?;
        check_amount("commission_fee", &self.commission_fee)
    }
}

fn percent_of(value: &BigDecimal, pct: &BigDecimal) -> BigDecimal {
    let ratio = pct / &BigDecimal::from(100);
    value * &ratio
}

pub fn compute_totals(input: &PricingInput<'_>) -> OrderTotals {
    let zero = BigDecimal::zero();

    let subtotal: BigDecimal = input
        .items
        .iter()
        .map(|item| &item.unit_price * BigDecimal::from(item.quantity))
        .sum();
    let item_discount_sum: BigDecimal = input
        .items
        .iter()
        .filter_map(|item| item.discount.as_ref())
        .sum();

    let tax = match input.shop {
        Some(shop) => percent_of(&subtotal, shop.tax_pct.as_ref().unwrap_or(&zero)),
        None => BigDecimal::zero(),
    };
    let mut running = &subtotal + &tax;

    let coupon_discount = match input.coupon {
        Some(coupon) => match coupon.discount_type {
            DiscountType::Percentage => percent_of(&running, &coupon.discount),
            DiscountType::Fixed => coupon.discount.clone(),
        },
        None => BigDecimal::zero(),
    };
    let total_discount = item_discount_sum + coupon_discount;
    running -= &total_discount;

    let service_fee = input.service_fee.cloned().unwrap_or_default();
    running += &service_fee;
    if let Some(delivery_fee) = input.delivery_fee {
        running += delivery_fee;
    }

    let commission_fee = match input.shop {
        Some(shop) => percent_of(&running, shop.commission_pct.as_ref().unwrap_or(&zero)),
        None => BigDecimal::zero(),
    };

    OrderTotals {
        total_price: running,
        tax,
        total_discount,
        service_fee,
        commission_fee,
    }
}
