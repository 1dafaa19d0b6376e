use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::catalog::MAX_COUPON_CODE_LEN;
use super::errors::DomainError;
use super::money::check_amount;
use super::pricing::{LineItem, OrderTotals};

#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub discount: Option<BigDecimal>,
}

impl OrderLineInput {
    pub fn as_line_item(&self) -> LineItem {
        LineItem {
            quantity: self.quantity,
            unit_price: self.unit_price.clone(),
            discount: self.discount.clone(),
        }
    }
}

/// The client-supplied part of an order. Totals are never part of a draft.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub coupon_code: Option<String>,
    pub delivery_fee: Option<BigDecimal>,
    pub lines: Vec<OrderLineInput>,
}

impl OrderDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.lines.is_empty() {
            return Err(DomainError::invalid("an order needs at least one line item"));
        }
        for (idx, line) in self.lines.iter().enumerate() {
            let at = |field: &str| format!("line {}: {}", idx, field);
            if line.quantity < 0 {
                return Err(DomainError::invalid(format!(
                    "{} must not be negative",
                    at("quantity")
                )));
            }
            if line.unit_price < BigDecimal::zero() {
                return Err(DomainError::invalid(format!(
                    "{} must not be negative",
                    at("unit_price")
                )));
            }
            check_amount(&at("unit_price"), &line.unit_price)?;
            if let Some(discount) = &line.discount {
                if discount < &BigDecimal::zero() {
                    return Err(DomainError::invalid(format!(
                        "{} must not be negative",
                        at("discount")
                    )));
                }
                check_amount(&at("discount"), discount)?;
            }
        }
        if let Some(fee) = &self.delivery_fee {
            if fee < &BigDecimal::zero() {
                return Err(DomainError::invalid("delivery_fee must not be negative"));
            }
            check_amount("delivery_fee", fee)?;
        }
        if self
            .coupon_code()
            .is_some_and(|code| code.chars().count() > MAX_COUPON_CODE_LEN)
        {
            return Err(DomainError::invalid(format!(
                "coupon_code must be at most {} characters",
                MAX_COUPON_CODE_LEN
            )));
        }
        Ok(())
    }

    /// Blank coupon codes count as no coupon.
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.lines.iter().map(OrderLineInput::as_line_item).collect()
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub discount: Option<BigDecimal>,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub coupon_code: Option<String>,
    pub delivery_fee: Option<BigDecimal>,
    pub totals: OrderTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn draft() -> OrderDraft {
        OrderDraft {
            customer_id: Uuid::new_v4(),
            shop_id: None,
            coupon_code: None,
            delivery_fee: Some(dec("4.00")),
            lines: vec![OrderLineInput {
                product_id: Some(Uuid::new_v4()),
                quantity: 2,
                unit_price: dec("9.99"),
                discount: Some(dec("1.00")),
            }],
        }
    }

    #[test]
    fn well_formed_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn zero_quantity_is_allowed() {
        let mut d = draft();
        d.lines[0].quantity = 0;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn negative_values_are_rejected() {
        let mut d = draft();
        d.lines[0].quantity = -1;
        assert!(matches!(d.validate(), Err(DomainError::InvalidArgument(_))));

        let mut d = draft();
        d.lines[0].unit_price = dec("-0.01");
        assert!(d.validate().is_err());

        let mut d = draft();
        d.lines[0].discount = Some(dec("-5"));
        assert!(d.validate().is_err());

        let mut d = draft();
        d.delivery_fee = Some(dec("-1"));
        assert!(d.validate().is_err());
    }

    #[test]
    fn empty_order_is_rejected() {
        let mut d = draft();
        d.lines.clear();
        assert!(d.validate().is_err());
    }

    #[test]
    fn amounts_must_fit_two_decimal_places() {
        let mut d = draft();
        d.lines[0].quantity = 3;
        d.lines[0].unit_price = dec("3.333");
        assert!(matches!(d.validate(), Err(DomainError::InvalidArgument(_))));

        let mut d = draft();
        d.lines[0].discount = Some(dec("1e-2000000"));
        assert!(d.validate().is_err());

        let mut d = draft();
        d.delivery_fee = Some(dec("10000000000"));
        assert!(d.validate().is_err());

        let mut d = draft();
        d.lines[0].unit_price = dec("3.330");
        assert!(d.validate().is_ok());
    }

    #[test]
    fn overlong_coupon_code_is_rejected() {
        let mut d = draft();
        d.coupon_code = Some("X".repeat(MAX_COUPON_CODE_LEN + 1));
        assert!(matches!(d.validate(), Err(DomainError::InvalidArgument(_))));

        d.coupon_code = Some(format!("  {}  ", "X".repeat(MAX_COUPON_CODE_LEN)));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn blank_coupon_code_is_ignored() {
        let mut d = draft();
        d.coupon_code = Some("  ".to_string());
        assert_eq!(d.coupon_code(), None);

        d.coupon_code = Some(" SAVE10 ".to_string());
        assert_eq!(d.coupon_code(), Some("SAVE10"));
    }
}
