use crate::DbError;
use crate::adapter::ListingRecord;
use crate::repository::{ListingFilter, ListingRepository};
use async_trait::async_trait;
use core_types::{MISSING_TEXT, Property, PropertyId, eq_ignore_case, fold_label};
use sqlx::postgres::PgPool;

const LISTING_COLUMNS: &str = "listing_id, code, department, municipality, neighborhood, \
     property_type, area, list_price, features";

/// `ListingRepository` backed by PostgreSQL.
///
/// Expects the `listings` and `searches` tables of `schema.sql` at the root of
/// this crate. Text matching is `LOWER(TRIM(column)) = $n`, with the parameter
/// folded in Rust the same way `eq_ignore_case` folds it. The text columns
/// must use a Unicode-aware collation (the schema declares `und-x-icu`):
/// under the `C` collation `LOWER` only folds ASCII, and "MEDELLÍN" would
/// stop matching "Medellín".
#[derive(Debug, Clone)]
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    /// Creates a new `PgListingRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// True for municipality filters that no listing can satisfy.
fn names_no_municipality(municipality: &str) -> bool {
    municipality.trim().is_empty() || eq_ignore_case(municipality, MISSING_TEXT)
}

#[async_trait]
impl ListingRepository for PgListingRepository {
    async fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, DbError> {
        let query = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE listing_id = $1");
        let record = sqlx::query_as::<_, ListingRecord>(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        record.map(Property::try_from).transpose()
    }

    async fn find_listings(&self, filter: &ListingFilter) -> Result<Vec<Property>, DbError> {
        if filter.municipality.as_deref().is_some_and(names_no_municipality) {
            return Ok(Vec::new());
        }

        let query = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings
            WHERE ($1::TEXT IS NULL OR LOWER(TRIM(property_type)) = $1)
              AND ($2::TEXT IS NULL OR LOWER(TRIM(municipality)) = $2)
            ORDER BY code ASC, listing_id ASC
            "#
        );
        let records = sqlx::query_as::<_, ListingRecord>(&query)
            .bind(filter.property_type.as_deref().map(fold_label))
            .bind(filter.municipality.as_deref().map(fold_label))
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(?filter, found = records.len(), "Listing query executed.");
        records.into_iter().map(Property::try_from).collect()
    }

    async fn count_searches(&self, municipality: &str) -> Result<u64, DbError> {
        if names_no_municipality(municipality) {
            return Ok(0);
        }

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM searches WHERE LOWER(TRIM(municipality)) = $1",
        )
        .bind(fold_label(municipality))
        .fetch_one(&self.pool)
        .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
