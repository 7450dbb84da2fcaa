//! # Vitrina Database Crate
//!
//! Read-only access to the listing store.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** Storage details stay in this crate. The rest of the
//!   application sees the `ListingRepository` trait and fully formed
//!   `Property` values; defaults for missing fields are filled here, once.
//! - **Substitutable:** `PgListingRepository` serves production traffic while
//!   `InMemoryListingRepository` serves tests and JSON snapshots.
//!
//! ## Public API
//!
//! - `connect`: establishes the PostgreSQL connection pool.
//! - `ListingRepository`, `ListingFilter`: the repository seam and its query criteria.
//! - `PgListingRepository`, `InMemoryListingRepository`: the two implementations.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod adapter;
pub mod connection;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use adapter::ListingRecord;
pub use connection::connect;
pub use error::DbError;
pub use memory::InMemoryListingRepository;
pub use postgres::PgListingRepository;
pub use repository::{ListingFilter, ListingRepository};
