use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use super::errors::DomainError;
use super::money::check_amount;

pub const MAX_COUPON_CODE_LEN: usize = 64;
pub const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    /// 0..=100, absent means 0.
    pub tax_pct: Option<BigDecimal>,
    /// 0..=100, absent means 0.
    pub commission_pct: Option<BigDecimal>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::Fixed => "FIXED",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERCENTAGE" => Ok(DiscountType::Percentage),
            "FIXED" => Ok(DiscountType::Fixed),
            other => Err(DomainError::invalid(format!(
                "unknown discount type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewShop {
    pub name: String,
    pub tax_pct: Option<BigDecimal>,
    pub commission_pct: Option<BigDecimal>,
    pub is_default: bool,
}

#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount: BigDecimal,
}

fn check_percentage(field: &str, value: Option<&BigDecimal>) -> Result<(), DomainError> {
    let Some(value) = value else {
        return Ok(());
    };
    if value < &BigDecimal::zero() || value > &BigDecimal::from(100) {
        return Err(DomainError::invalid(format!(
            "{} must be between 0 and 100, got {}",
            field, value
        )));
    }
    check_amount(field, value)
}

impl NewShop {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("shop name must not be empty"));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::invalid(format!(
                "shop name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        check_percentage("tax_pct", self.tax_pct.as_ref())?;
        check_percentage("commission_pct", self.commission_pct.as_ref())
    }
}

impl NewCoupon {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.code.trim().is_empty() {
            return Err(DomainError::invalid("coupon code must not be empty"));
        }
        if self.code.chars().count() > MAX_COUPON_CODE_LEN {
            return Err(DomainError::invalid(format!(
                "coupon code must be at most {} characters",
                MAX_COUPON_CODE_LEN
            )));
        }
        match self.discount_type {
            DiscountType::Percentage => check_percentage("discount", Some(&self.discount)),
            DiscountType::Fixed if self.discount < BigDecimal::zero() => Err(
                DomainError::invalid("discount must not be negative"),
            ),
            DiscountType::Fixed => check_amount("discount", &self.discount),
        }
    }
}
