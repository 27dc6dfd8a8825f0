use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidationError;

use crate::utils::error::FieldError;

pub fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("range").with_message("Price cannot be negative".into()));
    }
    Ok(())
}

pub fn positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::new("range").with_message("Price per night must be positive".into()));
    }
    Ok(())
}

// Query-string parsers; each pushes a field error instead of failing fast so
// the caller sees every bad parameter at once.

pub fn parse_uuid(field: &str, raw: &str, errors: &mut Vec<FieldError>) -> Option<Uuid> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(FieldError::new(field, format!("Invalid {}", field.replace('_', " ")), "invalid_uuid"));
            None
        }
    }
}

pub fn parse_date(field: &str, raw: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("Invalid {} format (YYYY-MM-DD)", field.replace('_', " ")),
                "invalid_string",
            ));
            None
        }
    }
}

pub fn parse_positive_int(field: &str, raw: &str, errors: &mut Vec<FieldError>) -> Option<i32> {
    match raw.trim().parse::<i32>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            errors.push(FieldError::new(
                field,
                format!("{} must be a positive integer", field.replace('_', " ")),
                "invalid_string",
            ));
            None
        }
    }
}

/// Draft kinds are short slugs: `[a-z0-9-]{1,64}`.
pub fn is_valid_draft_kind(kind: &str) -> bool {
    !kind.is_empty()
        && kind.len() <= 64
        && kind
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
