use crate::DbError;
use async_trait::async_trait;
use core_types::{Property, PropertyId};

/// Criteria for a listing search. `None` means "do not filter on this field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub property_type: Option<String>,
    pub municipality: Option<String>,
}

impl ListingFilter {
    /// Builds a filter from user input: values are trimmed and blank values
    /// are treated as absent.
    pub fn new(property_type: Option<&str>, municipality: Option<&str>) -> Self {
        let clean = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            property_type: clean(property_type),
            municipality: clean(municipality),
        }
    }

    /// A filter pinned to one municipality, even a blank one.
    pub fn for_municipality(municipality: &str, property_type: Option<&str>) -> Self {
        Self {
            municipality: Some(municipality.trim().to_string()),
            ..Self::new(property_type, None)
        }
    }

    /// Case-insensitive exact match on every field that is set.
    pub fn matches(&self, property: &Property) -> bool {
        let type_ok = self
            .property_type
            .as_deref()
            .is_none_or(|t| property.is_type(t));
        let municipality_ok = self
            .municipality
            .as_deref()
            .is_none_or(|m| property.in_municipality(m));
        type_ok && municipality_ok
    }
}

/// Read-only access to the listing store.
///
/// Implementations must be safe to share across tasks; the statistics service
/// holds one behind an `Arc` for its whole lifetime.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Fetches a single listing, or `None` if the id is unknown.
    async fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, DbError>;

    /// Fetches every listing matching `filter`.
    async fn find_listings(&self, filter: &ListingFilter) -> Result<Vec<Property>, DbError>;

    /// Fetches the listings of a municipality, optionally restricted to one type.
    ///
    /// Listings without a municipality never match, whatever placeholder they carry.
    async fn find_by_municipality(
        &self,
        municipality: &str,
        type_filter: Option<&str>,
    ) -> Result<Vec<Property>, DbError> {
        self.find_listings(&ListingFilter::for_municipality(municipality, type_filter))
            .await
    }

    /// Counts the buyer-suggestion searches recorded for listings in a municipality.
    async fn count_searches(&self, municipality: &str) -> Result<u64, DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_user_input_means_no_filter() {
        let filter = ListingFilter::new(Some("  "), Some(""));
        assert_eq!(filter, ListingFilter::default());
    }

    #[test]
    fn user_input_is_trimmed() {
        let filter = ListingFilter::new(Some(" Casa "), None);
        assert_eq!(filter.property_type.as_deref(), Some("Casa"));
        assert!(filter.municipality.is_none());
    }

    #[test]
    fn municipality_filter_keeps_blank_value() {
        let filter = ListingFilter::for_municipality("", Some(""));
        assert_eq!(filter.municipality.as_deref(), Some(""));
        assert!(filter.property_type.is_none());
    }
}
