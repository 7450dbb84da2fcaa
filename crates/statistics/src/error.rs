use analytics::CalculationError;
use core_types::{Metric, PropertyId};
use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatisticsError {
    #[error("No listing found with id {0}")]
    NotFound(PropertyId),

    #[error("Failed to compute {metric}: {source}")]
    Metric {
        metric: Metric,
        #[source]
        source: CalculationError,
    },

    #[error("Listing store unavailable: {0}")]
    UpstreamUnavailable(#[from] DbError),
}

impl StatisticsError {
    /// The metric that failed, if the error came from a calculator.
    pub fn metric(&self) -> Option<Metric> {
        match self {
            StatisticsError::Metric { metric, .. } => Some(*metric),
            _ => None,
        }
    }

    /// True when the listing itself violates the invariants needed to score it.
    pub fn is_validation(&self) -> bool {
        matches!(self, StatisticsError::Metric { source, .. } if source.is_validation())
    }
}

/// Tags a calculator result with the metric it was computing.
pub(crate) trait MetricContext<T> {
    fn for_metric(self, metric: Metric) -> Result<T, StatisticsError>;
}

impl<T> MetricContext<T> for Result<T, CalculationError> {
    fn for_metric(self, metric: Metric) -> Result<T, StatisticsError> {
        self.map_err(|source| StatisticsError::Metric { metric, source })
    }
}
