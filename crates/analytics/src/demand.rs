use crate::error::CalculationError;
use configuration::DemandSettings;
use rust_decimal::Decimal;

/// Upper bound of the demand score scale.
pub const MAX_DEMAND_SCORE: Decimal = Decimal::ONE_HUNDRED;

/// Activity observed in a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DemandInputs {
    /// Other listings in the same municipality, of any type.
    pub comparable_listings: u64,
    /// Buyer-suggestion searches recorded for listings in the municipality.
    pub recorded_searches: u64,
}

/// Scores market interest in a zone on a 0 to 100 scale.
///
/// ```text
/// score = 100 * (listing_weight * n / (n + k_listings) + search_weight * s / (s + k_searches))
/// ```
///
/// Each term saturates towards its weight, so the score never decreases when
/// either count grows and never exceeds 100. Rounded to 2 decimal places.
pub fn demand_score(
    inputs: &DemandInputs,
    settings: &DemandSettings,
) -> Result<Decimal, CalculationError> {
    let listings = saturation(
        inputs.comparable_listings,
        settings.listing_half_saturation,
    )?;
    let searches = saturation(inputs.recorded_searches, settings.search_half_saturation)?;

    let weighted = settings
        .listing_weight
        .checked_mul(listings)
        .zip(settings.search_weight.checked_mul(searches))
        .and_then(|(l, s)| l.checked_add(s))
        .and_then(|v| v.checked_mul(MAX_DEMAND_SCORE))
        .ok_or_else(|| CalculationError::Overflow("demand score".to_string()))?;

    Ok(weighted.clamp(Decimal::ZERO, MAX_DEMAND_SCORE).round_dp(2))
}

/// `count / (count + half)`: 0 at no activity, 0.5 at `half`, approaching 1.
fn saturation(count: u64, half: Decimal) -> Result<Decimal, CalculationError> {
    if half <= Decimal::ZERO {
        return Err(CalculationError::Validation(format!(
            "half-saturation constant must be greater than 0, got {half}"
        )));
    }
    let count = Decimal::from(count);
    count
        .checked_add(half)
        .and_then(|denominator| count.checked_div(denominator))
        .ok_or_else(|| CalculationError::Overflow("demand saturation".to_string()))
}
