use serde::{Deserialize, Serialize};
use std::fmt;

/// One analytical dimension of a statistics report.
///
/// The `Display` form is the stable camelCase key used in error messages and
/// in the export rows, so it must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    PricePerArea,
    AreaComparison,
    EstimatedAnnualReturnPercent,
    DemandScore,
}

impl Metric {
    /// Returns the stable key of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::PricePerArea => "pricePerArea",
            Metric::AreaComparison => "areaComparison",
            Metric::EstimatedAnnualReturnPercent => "estimatedAnnualReturnPercent",
            Metric::DemandScore => "demandScore",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
