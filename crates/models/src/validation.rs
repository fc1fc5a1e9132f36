//! Field rules shared by the write payloads.

use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Reject strings made only of whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

/// Non-negative decimal written as text, e.g. `"1200.50"`.
pub fn decimal_amount(value: &str) -> Result<(), ValidationError> {
    match parse_amount(value) {
        Some(d) if d.is_sign_negative() => Err(error("negative", "must not be negative")),
        Some(_) => Ok(()),
        None => Err(error("decimal", "must be a decimal number")),
    }
}

/// Three-letter ISO 4217 style code.
pub fn currency_code(value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(());
    }
    Err(error("currency", "must be a three-letter currency code"))
}

pub fn parse_amount(value: &str) -> Option<Decimal> {
    Decimal::from_str(value.trim()).ok()
}

/// Build a single-field failure in the same shape `Validate::validate` returns.
pub fn field_error(field: &'static str, code: &'static str, message: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error(code, message));
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_blank_rejects_whitespace() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank(" a ").is_ok());
    }

    #[test]
    fn decimal_amount_accepts_text_decimals() {
        assert!(decimal_amount("0").is_ok());
        assert!(decimal_amount("1200.50").is_ok());
        assert!(decimal_amount("-1").is_err());
        assert!(decimal_amount("12,5").is_err());
        assert!(decimal_amount("").is_err());
    }

    #[test]
    fn currency_code_requires_three_letters() {
        assert!(currency_code("usd").is_ok());
        assert!(currency_code("EUR").is_ok());
        assert!(currency_code("EU").is_err());
        assert!(currency_code("E1R").is_err());
    }

    #[test]
    fn field_error_names_the_field() {
        let errs = field_error("min_monthly_rent", "range", "must not exceed max_monthly_rent");
        assert!(errs.errors().contains_key("min_monthly_rent"));
    }
}
