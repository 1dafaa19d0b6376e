//! Limits on decimal amounts.
//!
//! Money and percentage columns hold two fractional digits and at most ten
//! integer digits. Amounts outside that shape are rejected before pricing so
//! that what is priced is exactly what gets stored.

use bigdecimal::{BigDecimal, Zero};

use super::errors::DomainError;

pub const MAX_FRACTION_DIGITS: i64 = 2;
pub const MAX_INTEGER_DIGITS: i64 = 10;

pub fn check_amount(field: &str, value: &BigDecimal) -> Result<(), DomainError> {
    // Zero may arrive with any exponent ("0e-9999"); it always fits.
    let (digits, _) = value.as_bigint_and_exponent();
    if digits.is_zero() {
        return Ok(());
    }

    let normalized = value.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    if scale > MAX_FRACTION_DIGITS {
        return Err(DomainError::invalid(format!(
            "{} must have at most {} decimal places",
            field, MAX_FRACTION_DIGITS
        )));
    }
    let integer_digits = normalized.digits() as i64 - scale;
    if integer_digits > MAX_INTEGER_DIGITS {
        return Err(DomainError::invalid(format!(
            "{} must have at most {} integer digits",
            field, MAX_INTEGER_DIGITS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn cents_and_trailing_zeros_fit() {
        for ok in ["0", "9.99", "3.330", "-12.5", "9999999999.99", "0e-5000", "1e2"] {
            assert!(check_amount("amount", &dec(ok)).is_ok(), "{}", ok);
        }
    }

    #[test]
    fn sub_cent_precision_is_rejected() {
        for bad in ["3.333", "0.001", "1e-2000000"] {
            assert!(
                matches!(check_amount("amount", &dec(bad)), Err(DomainError::InvalidArgument(_))),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn more_than_ten_integer_digits_is_rejected() {
        for bad in ["10000000000", "1e10", "1e2000000"] {
            assert!(
                matches!(check_amount("amount", &dec(bad)), Err(DomainError::InvalidArgument(_))),
                "{}",
                bad
            );
        }
    }
}
