use crate::error::CalculationError;
use configuration::InvestmentSettings;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where the gross rental yield of an estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum YieldSource {
    /// The configured default rate; the zone had no reference price.
    Default,
    /// The default rate scaled by the zone's price per area relative to the listing's.
    ZoneAdjusted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentEstimate {
    pub estimated_annual_return_percent: Decimal,
    pub gross_rental_yield_percent: Decimal,
    pub yield_source: YieldSource,
}

/// Estimates the annual return of buying the listing at `list_price` to rent it out.
///
/// Rents are assumed to follow the zone rather than the asking price, so when
/// the zone's average price per area is known the default yield is scaled by
/// `zone_average / listing_price_per_area`: a listing priced above its zone
/// earns proportionally less rent per unit of money invested.
///
/// ```text
/// return % = gross_yield * (1 - vacancy_rate) - operating_cost_pct + appreciation_pct
/// ```
///
/// The result may be negative. Missing zone data is not an error.
pub fn estimate_annual_return(
    list_price: Decimal,
    area: Decimal,
    zone_average_price_per_area: Option<Decimal>,
    settings: &InvestmentSettings,
) -> Result<InvestmentEstimate, CalculationError> {
    if list_price <= Decimal::ZERO {
        return Err(CalculationError::Validation(format!(
            "list price must be greater than 0, got {list_price}"
        )));
    }

    let base_yield = settings.default_rental_yield_pct;
    let (gross_rental_yield_percent, yield_source) = match zone_average_price_per_area {
        Some(zone_average) if zone_average > Decimal::ZERO && area > Decimal::ZERO => {
            let adjusted = base_yield
                .checked_mul(zone_average)
                .and_then(|v| v.checked_mul(area))
                .and_then(|v| v.checked_div(list_price))
                .ok_or_else(|| CalculationError::Overflow("gross rental yield".to_string()))?;
            (adjusted, YieldSource::ZoneAdjusted)
        }
        _ => (base_yield, YieldSource::Default),
    };

    let occupied_share = Decimal::ONE - settings.vacancy_rate;
    let estimated_annual_return_percent = gross_rental_yield_percent
        .checked_mul(occupied_share)
        .and_then(|v| v.checked_sub(settings.operating_cost_pct))
        .and_then(|v| v.checked_add(settings.appreciation_pct))
        .ok_or_else(|| CalculationError::Overflow("estimated annual return".to_string()))?;

    tracing::debug!(
        %gross_rental_yield_percent,
        ?yield_source,
        %estimated_annual_return_percent,
        "Estimated annual return."
    );

    Ok(InvestmentEstimate {
        estimated_annual_return_percent,
        gross_rental_yield_percent,
        yield_source,
    })
}
