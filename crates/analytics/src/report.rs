use crate::investment::{InvestmentEstimate, YieldSource};
use crate::zone::ZoneComparison;
use core_types::PropertyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Labels of the export rows, in export order. Downstream tabular consumers
/// key on these, so neither the order nor the spelling may change.
pub const EXPORT_LABELS: [&str; 5] = [
    "pricePerArea",
    "averageAreaPrice",
    "priceDifferencePercent",
    "estimatedAnnualReturnPercent",
    "demandScore",
];

/// The analytical report for a single listing.
///
/// Built fresh on every request. A value is either computed or, for the zone
/// comparison only, explicitly `NotAvailable`; there are no placeholder zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub property_id: PropertyId,
    pub basic_metrics: BasicMetrics,
    pub area_comparison: AreaComparison,
    pub investment_metrics: InvestmentMetrics,
    pub zone_demand: ZoneDemand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicMetrics {
    pub price_per_area: Decimal,
}

/// Comparison of the listing against its zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AreaComparison {
    Available {
        average_area_price: Decimal,
        price_difference_percent: Decimal,
        comparable_count: usize,
    },
    /// The zone has no comparable listings, so there is no average to compare to.
    NotAvailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentMetrics {
    pub estimated_annual_return_percent: Decimal,
    pub gross_rental_yield_percent: Decimal,
    pub yield_source: YieldSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDemand {
    pub demand_score: Decimal,
    pub comparable_listings: u64,
    pub recorded_searches: u64,
}

/// One row of the flat export view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportRow {
    pub label: &'static str,
    /// `None` when the metric is not available.
    pub value: Option<Decimal>,
}

impl AreaComparison {
    pub fn average_area_price(&self) -> Option<Decimal> {
        match self {
            AreaComparison::Available {
                average_area_price, ..
            } => Some(*average_area_price),
            AreaComparison::NotAvailable { .. } => None,
        }
    }

    pub fn price_difference_percent(&self) -> Option<Decimal> {
        match self {
            AreaComparison::Available {
                price_difference_percent,
                ..
            } => Some(*price_difference_percent),
            AreaComparison::NotAvailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AreaComparison::Available { .. })
    }
}

impl From<ZoneComparison> for AreaComparison {
    fn from(comparison: ZoneComparison) -> Self {
        AreaComparison::Available {
            average_area_price: comparison.average_area_price,
            price_difference_percent: comparison.price_difference_percent,
            comparable_count: comparison.comparable_count,
        }
    }
}

impl From<InvestmentEstimate> for InvestmentMetrics {
    fn from(estimate: InvestmentEstimate) -> Self {
        Self {
            estimated_annual_return_percent: estimate.estimated_annual_return_percent,
            gross_rental_yield_percent: estimate.gross_rental_yield_percent,
            yield_source: estimate.yield_source,
        }
    }
}

impl StatisticsReport {
    /// Flattens the report into the five export rows, in `EXPORT_LABELS` order.
    pub fn export_rows(&self) -> [ExportRow; 5] {
        let values = [
            Some(self.basic_metrics.price_per_area),
            self.area_comparison.average_area_price(),
            self.area_comparison.price_difference_percent(),
            Some(self.investment_metrics.estimated_annual_return_percent),
            Some(self.zone_demand.demand_score),
        ];

        std::array::from_fn(|i| ExportRow {
            label: EXPORT_LABELS[i],
            value: values[i],
        })
    }
}
