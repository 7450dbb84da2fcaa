use crate::DbError;
use crate::adapter::ListingRecord;
use crate::repository::{ListingFilter, ListingRepository};
use async_trait::async_trait;
use core_types::{Property, PropertyId, fold_label};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A listing store held entirely in memory.
///
/// Used by tests and for running the engine against a JSON snapshot of the
/// listing collections instead of a live database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryListingRepository {
    listings: Vec<Property>,
    /// Search counts keyed by lowercased, trimmed municipality.
    searches: HashMap<String, u64>,
}

/// On-disk snapshot format: the listing documents plus the recorded searches.
#[derive(Debug, Deserialize)]
struct Snapshot {
    listings: Vec<ListingRecord>,
    #[serde(default)]
    searches: Vec<SearchRecord>,
}

#[derive(Debug, Deserialize)]
struct SearchRecord {
    #[serde(rename = "Municipio")]
    municipality: Option<String>,
}

fn search_key(municipality: &str) -> String {
    fold_label(municipality)
}

impl InMemoryListingRepository {
    pub fn new(listings: Vec<Property>) -> Self {
        Self {
            listings,
            searches: HashMap::new(),
        }
    }

    /// Records `count` additional searches for `municipality`.
    pub fn with_searches(mut self, municipality: &str, count: u64) -> Self {
        *self.searches.entry(search_key(municipality)).or_default() += count;
        self
    }

    /// Loads a snapshot such as `{"listings": [...], "searches": [...]}`.
    ///
    /// Listing documents go through the same adapter as database rows, so
    /// missing fields get the same defaults. Documents without an id cannot be
    /// looked up and are skipped with a warning.
    pub fn from_json_str(json: &str) -> Result<Self, DbError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut listings = Vec::with_capacity(snapshot.listings.len());
        for record in snapshot.listings {
            match Property::try_from(record) {
                Ok(property) => listings.push(property),
                Err(e) => tracing::warn!("Skipping snapshot listing: {}", e),
            }
        }

        let mut repo = Self::new(listings);
        for search in snapshot.searches {
            if let Some(municipality) = search.municipality {
                repo = repo.with_searches(&municipality, 1);
            }
        }

        tracing::info!(
            listings = repo.listings.len(),
            searches = repo.searches.values().sum::<u64>(),
            "Loaded listing snapshot."
        );
        Ok(repo)
    }

    pub async fn from_json_file(path: &Path) -> Result<Self, DbError> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, DbError> {
        Ok(self.listings.iter().find(|p| &p.id == id).cloned())
    }

    async fn find_listings(&self, filter: &ListingFilter) -> Result<Vec<Property>, DbError> {
        Ok(self
            .listings
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn count_searches(&self, municipality: &str) -> Result<u64, DbError> {
        Ok(self
            .searches
            .get(&search_key(municipality))
            .copied()
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Location;
    use rust_decimal_macros::dec;

    fn listing(municipality: &str, property_type: &str) -> Property {
        Property {
            id: PropertyId::random(),
            code: "C".to_string(),
            location: Location {
                department: "Antioquia".to_string(),
                municipality: municipality.to_string(),
                neighborhood: "N/A".to_string(),
            },
            property_type: property_type.to_string(),
            area: dec!(80),
            list_price: dec!(160000),
            features: vec![],
        }
    }

    fn repo() -> InMemoryListingRepository {
        InMemoryListingRepository::new(vec![
            listing("Envigado", "Apartamento"),
            listing("envigado", "Casa"),
            listing("Medellín", "Apartamento"),
        ])
    }

    #[tokio::test]
    async fn finds_by_id() {
        let repo = repo();
        let target = repo.listings[2].clone();
        assert_eq!(repo.find_by_id(&target.id).await.unwrap(), Some(target));
        assert_eq!(repo.find_by_id(&PropertyId::random()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn municipality_query_is_case_insensitive_exact() {
        let repo = repo();
        assert_eq!(repo.find_by_municipality("ENVIGADO", None).await.unwrap().len(), 2);
        assert_eq!(
            repo.find_by_municipality("envigado", Some("casa")).await.unwrap().len(),
            1
        );
        assert!(repo.find_by_municipality("Envi", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_filter_returns_everything() {
        let repo = repo();
        let all = repo.find_listings(&ListingFilter::new(None, Some(" "))).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn search_counts_ignore_case() {
        let repo = repo().with_searches("Envigado", 3).with_searches("ENVIGADO ", 2);
        assert_eq!(repo.count_searches("envigado").await.unwrap(), 5);
        assert_eq!(repo.count_searches("Itagüí").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn loads_snapshot_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("listings.json");
        std::fs::write(
            &path,
            r#"{
                "listings": [
                    {"_id": "65a1f0c2e4b0a1b2c3d4e5f6", "Municipio": "Envigado", "Tipo": "Casa", "Area": 120, "Precio de lista": 300000},
                    {"_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f7"}, "Municipio": "Sabaneta"},
                    {"Municipio": "Sabaneta", "Codigo": "NO-ID"}
                ],
                "searches": [{"Municipio": "Envigado"}, {"Municipio": "envigado"}, {}]
            }"#,
        )
        .unwrap();

        let repo = InMemoryListingRepository::from_json_file(&path).await.unwrap();
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.count_searches("Envigado").await.unwrap(), 2);
        let sabaneta = repo.find_by_municipality("sabaneta", None).await.unwrap();
        assert_eq!(sabaneta.len(), 1);
        assert_eq!(sabaneta[0].property_type, "N/A");

        let id: PropertyId = "65a1f0c2e4b0a1b2c3d4e5f6".parse().unwrap();
        let house = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(house.property_type, "Casa");
    }

    #[test]
    fn reloading_a_snapshot_keeps_ids_stable() {
        let json = r#"{"listings": [{"_id": "65a1f0c2e4b0a1b2c3d4e5f6", "Municipio": "Bello"}]}"#;
        let first = InMemoryListingRepository::from_json_str(json).unwrap();
        let second = InMemoryListingRepository::from_json_str(json).unwrap();
        assert_eq!(first.listings[0].id, second.listings[0].id);
    }

    #[tokio::test]
    async fn listings_without_municipality_form_no_zone() {
        let repo = InMemoryListingRepository::new(vec![
            listing("N/A", "Casa"),
            listing("N/A", "Casa"),
            listing("Bello", "Casa"),
        ]);
        assert!(repo.find_by_municipality("N/A", None).await.unwrap().is_empty());
        assert_eq!(repo.find_listings(&ListingFilter::default()).await.unwrap().len(), 3);
    }

    #[test]
    fn malformed_snapshot_is_a_json_error() {
        assert!(matches!(
            InMemoryListingRepository::from_json_str("[1, 2]"),
            Err(DbError::JsonError(_))
        ));
    }
}
