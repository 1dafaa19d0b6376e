pub mod catalog;
pub mod delivery_points;
pub mod orders;

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::money::check_amount;
use crate::errors::AppError;

/// Longest decimal string accepted: ten integer digits, two decimals, sign,
/// point and some padding zeros.
const MAX_DECIMAL_LEN: usize = 32;

/// Parse a decimal amount sent as a string, e.g. "9.99". Only amounts that fit
/// a two-decimal money column are accepted.
pub(crate) fn parse_decimal(field: &str, raw: &str) -> Result<BigDecimal, AppError> {
    let trimmed = raw.trim();
    if trimmed.len() > MAX_DECIMAL_LEN {
        return Err(AppError::BadRequest(format!("{} is too long", field)));
    }
    let value = BigDecimal::from_str(trimmed)
        .map_err(|e| AppError::BadRequest(format!("Invalid {} '{}': {}", field, raw, e)))?;
    check_amount(field, &value)?;
    Ok(value)
}

pub(crate) fn parse_optional_decimal(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<BigDecimal>, AppError> {
    raw.map(|r| parse_decimal(field, r)).transpose()
}

/// Render an amount with exactly two fractional digits, e.g. "0.00".
pub(crate) fn money(value: &BigDecimal) -> String {
    let rounded = value.round(2).with_scale(2);
    let sign = if rounded < BigDecimal::zero() { "-" } else { "" };
    let (cents, _) = rounded.as_bigint_and_exponent();
    let digits = format!("{:0>3}", cents.magnitude().to_string());
    let (units, fraction) = digits.split_at(digits.len() - 2);
    format!("{}{}.{}", sign, units, fraction)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}
