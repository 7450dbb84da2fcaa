pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Metric;
pub use error::CoreError;
pub use structs::{MISSING_TEXT, Location, Property, PropertyId, eq_ignore_case, fold_label};
