//! # Vitrina Statistics Service
//!
//! Assembles the statistics report of one listing: fetches the listing and
//! the rest of its zone, runs every metric calculator and merges the results.
//!
//! A report is either complete or the request fails with a single error that
//! names the failing metric. The one exception is the zone comparison: a
//! listing alone in its zone has nothing to be compared against, so that
//! sub-report is marked not available while the others are still computed.

use crate::error::MetricContext;
use analytics::{
    AreaComparison, BasicMetrics, CalculationError, DemandInputs, InvestmentMetrics,
    StatisticsReport, ZoneDemand, compare_to_zone, comparables, demand_score,
    estimate_annual_return, price_per_area,
};
use configuration::AnalyticsSettings;
use core_types::{Metric, Property, PropertyId};
use database::ListingRepository;
use rust_decimal::Decimal;
use std::sync::Arc;

pub mod error;

pub use error::StatisticsError;

/// Computes listing statistics on top of a `ListingRepository`.
///
/// Holds no per-request state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct StatisticsService {
    repo: Arc<dyn ListingRepository>,
    settings: AnalyticsSettings,
}

impl StatisticsService {
    pub fn new(repo: Arc<dyn ListingRepository>, settings: AnalyticsSettings) -> Self {
        Self { repo, settings }
    }

    /// Builds the full statistics report for listing `id`.
    ///
    /// Only reads from the repository. Fails with `NotFound` for an unknown id,
    /// with `Metric` when a calculator rejects the listing and with
    /// `UpstreamUnavailable` when the repository cannot be read.
    pub async fn compute_statistics(
        &self,
        id: &PropertyId,
    ) -> Result<StatisticsReport, StatisticsError> {
        // 1. Fetch the subject and make sure it can be priced at all.
        let subject = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| StatisticsError::NotFound(id.clone()))?;

        let price_per_area =
            price_per_area(subject.area, subject.list_price).for_metric(Metric::PricePerArea)?;

        // 2. Fetch the zone. Both reads are independent.
        let Some(municipality) = subject.location.municipality_name() else {
            return self.report_without_zone(subject, price_per_area);
        };
        let (population, recorded_searches) = tokio::try_join!(
            self.repo.find_by_municipality(municipality, None),
            self.repo.count_searches(municipality),
        )?;
        tracing::debug!(
            property_id = %id,
            municipality,
            population = population.len(),
            recorded_searches,
            "Fetched zone population."
        );

        // 3. Run the remaining calculators.
        let area_comparison = self.area_comparison(&subject, price_per_area, &population)?;
        let demand_inputs = DemandInputs {
            comparable_listings: population.iter().filter(|p| p.id != subject.id).count() as u64,
            recorded_searches,
        };

        self.assemble(subject, price_per_area, area_comparison, demand_inputs)
    }

    /// A listing that does not say where it is has no zone: nothing to compare
    /// against and no measurable demand.
    fn report_without_zone(
        &self,
        subject: Property,
        price_per_area: Decimal,
    ) -> Result<StatisticsReport, StatisticsError> {
        let reason = "listing has no municipality".to_string();
        tracing::warn!(property_id = %subject.id, "Zone comparison not available: {}", reason);

        let demand_inputs = DemandInputs {
            comparable_listings: 0,
            recorded_searches: 0,
        };
        self.assemble(
            subject,
            price_per_area,
            AreaComparison::NotAvailable { reason },
            demand_inputs,
        )
    }

    /// Runs the zone-independent calculators and merges every sub-report.
    fn assemble(
        &self,
        subject: Property,
        price_per_area: Decimal,
        area_comparison: AreaComparison,
        demand_inputs: DemandInputs,
    ) -> Result<StatisticsReport, StatisticsError> {
        let investment = estimate_annual_return(
            subject.list_price,
            subject.area,
            area_comparison.average_area_price(),
            &self.settings.investment,
        )
        .for_metric(Metric::EstimatedAnnualReturnPercent)?;

        let demand_score =
            demand_score(&demand_inputs, &self.settings.demand).for_metric(Metric::DemandScore)?;

        // 4. Assemble.
        let report = StatisticsReport {
            property_id: subject.id,
            basic_metrics: BasicMetrics { price_per_area },
            area_comparison,
            investment_metrics: InvestmentMetrics::from(investment),
            zone_demand: ZoneDemand {
                demand_score,
                comparable_listings: demand_inputs.comparable_listings,
                recorded_searches: demand_inputs.recorded_searches,
            },
        };

        tracing::info!(
            property_id = %report.property_id,
            %price_per_area,
            zone_comparison = report.area_comparison.is_available(),
            %demand_score,
            "Computed listing statistics."
        );
        Ok(report)
    }

    /// Runs the zone comparison, downgrading an empty zone to `NotAvailable`.
    fn area_comparison(
        &self,
        subject: &Property,
        subject_price_per_area: Decimal,
        population: &[Property],
    ) -> Result<AreaComparison, StatisticsError> {
        let prices = comparables(subject, population, self.settings.compare_by_type)
            .map(|p| price_per_area(p.area, p.list_price))
            .collect::<Result<Vec<_>, _>>()
            .for_metric(Metric::AreaComparison)?;

        match compare_to_zone(subject_price_per_area, &prices) {
            Ok(comparison) => Ok(comparison.into()),
            Err(CalculationError::InsufficientData(reason)) => {
                tracing::warn!(
                    property_id = %subject.id,
                    municipality = %subject.location.municipality,
                    "Zone comparison not available: {}",
                    reason
                );
                Ok(AreaComparison::NotAvailable { reason })
            }
            Err(source) => Err(StatisticsError::Metric {
                metric: Metric::AreaComparison,
                source,
            }),
        }
    }
}
