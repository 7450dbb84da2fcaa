//! # Vitrina Analytics
//!
//! The metric calculators behind the listing statistics report.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Every calculator is a pure function of its inputs. Nothing
//!   here touches storage, so calculators may run in any order or in parallel.
//! - **Typed Failures:** Each calculator returns a specific `CalculationError`;
//!   deciding which failures are fatal for a whole report is the caller's job.
//!
//! ## Public API
//!
//! - `price_per_area`, `compare_to_zone`, `estimate_annual_return`, `demand_score`:
//!   the four calculators.
//! - `StatisticsReport`: the composite report and its five-row export view.
//! - `CalculationError`: the error type shared by the calculators.

// Declare the modules that constitute this crate.
pub mod demand;
pub mod error;
pub mod investment;
pub mod report;
pub mod unit_price;
pub mod zone;

// Re-export the key components to create a clean, public-facing API.
pub use demand::{DemandInputs, MAX_DEMAND_SCORE, demand_score};
pub use error::CalculationError;
pub use investment::{InvestmentEstimate, YieldSource, estimate_annual_return};
pub use report::{
    AreaComparison, BasicMetrics, EXPORT_LABELS, ExportRow, InvestmentMetrics, StatisticsReport,
    ZoneDemand,
};
pub use unit_price::price_per_area;
pub use zone::{ZoneComparison, compare_to_zone, comparables};
