use crate::error::CalculationError;
use rust_decimal::Decimal;

/// Price per square meter of a listing: `list_price / area`.
///
/// The quotient is exact up to `Decimal` precision; rounding is left to
/// whoever renders the value.
pub fn price_per_area(area: Decimal, list_price: Decimal) -> Result<Decimal, CalculationError> {
    if area <= Decimal::ZERO {
        return Err(CalculationError::DivisionByZero(format!(
            "area must be greater than 0, got {area}"
        )));
    }
    if list_price <= Decimal::ZERO {
        return Err(CalculationError::Validation(format!(
            "list price must be greater than 0, got {list_price}"
        )));
    }

    list_price
        .checked_div(area)
        .ok_or_else(|| CalculationError::Overflow("price per area".to_string()))
}
