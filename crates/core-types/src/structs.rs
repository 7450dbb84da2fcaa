use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Placeholder shown for text fields a stored listing does not carry.
pub const MISSING_TEXT: &str = "N/A";

/// Opaque unique key of a listing.
///
/// Keys are whatever the listing store uses (24-hex document ids, UUIDs, ...);
/// nothing but equality is ever assumed about them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    /// Wraps a stored key, trimming surrounding whitespace. Fails on a blank key.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput(
                "property id".to_string(),
                "must not be blank".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generates a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PropertyId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Where a listing sits. All fields are free-form text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub department: String,
    pub municipality: String,
    pub neighborhood: String,
}

impl Location {
    /// The municipality, or `None` when the listing does not say where it is.
    pub fn municipality_name(&self) -> Option<&str> {
        let name = self.municipality.trim();
        (!name.is_empty() && !eq_ignore_case(name, MISSING_TEXT)).then_some(name)
    }
}

/// A real-estate listing.
///
/// `area` is in square meters and `list_price` in currency units. Neither is
/// validated on construction: the metric calculators reject a listing that
/// cannot be priced, so the failure names the metric that needed the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    /// The agency's own listing code.
    pub code: String,
    pub location: Location,
    pub property_type: String,
    pub area: Decimal,
    pub list_price: Decimal,
    pub features: Vec<String>,
}

impl Property {
    /// True if the listing is in `municipality` (case-insensitive exact match).
    ///
    /// A listing without a municipality is in none, not in a shared "N/A" zone.
    pub fn in_municipality(&self, municipality: &str) -> bool {
        self.location
            .municipality_name()
            .is_some_and(|own| eq_ignore_case(own, municipality))
    }

    /// True if the listing's category is `property_type` (case-insensitive exact match).
    pub fn is_type(&self, property_type: &str) -> bool {
        eq_ignore_case(&self.property_type, property_type)
    }

    /// True if both area and list price are strictly positive.
    pub fn is_priceable(&self) -> bool {
        self.area > Decimal::ZERO && self.list_price > Decimal::ZERO
    }
}

/// Compares two free-form labels ignoring case and surrounding whitespace.
///
/// Uses full Unicode lowercasing so accented municipality names ("Medellín")
/// match regardless of how they were capitalized.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    fold_label(a) == fold_label(b)
}

/// The form `eq_ignore_case` compares: trimmed and Unicode-lowercased.
pub fn fold_label(label: &str) -> String {
    label.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing(municipality: &str, property_type: &str) -> Property {
        Property {
            id: PropertyId::random(),
            code: "A-1".to_string(),
            location: Location {
                department: "Antioquia".to_string(),
                municipality: municipality.to_string(),
                neighborhood: "Centro".to_string(),
            },
            property_type: property_type.to_string(),
            area: dec!(100),
            list_price: dec!(200000),
            features: vec![],
        }
    }

    #[test]
    fn municipality_match_ignores_case_and_whitespace() {
        let p = listing("Medellín", "Apartamento");
        assert!(p.in_municipality("MEDELLÍN"));
        assert!(p.in_municipality("  medellín "));
        assert!(!p.in_municipality("Medell"));
        assert!(p.is_type("apartamento"));
        assert!(!p.is_type("casa"));
    }

    #[test]
    fn priceable_requires_positive_area_and_price() {
        let mut p = listing("Envigado", "Casa");
        assert!(p.is_priceable());
        p.area = Decimal::ZERO;
        assert!(!p.is_priceable());
    }

    #[test]
    fn property_id_accepts_any_non_blank_key() {
        let id = PropertyId::random();
        let parsed: PropertyId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);

        let object_id: PropertyId = " 65a1f0c2e4b0a1b2c3d4e5f6 ".parse().unwrap();
        assert_eq!(object_id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6");
        assert!("   ".parse::<PropertyId>().is_err());
    }

    #[test]
    fn missing_municipality_matches_nothing() {
        let p = listing(MISSING_TEXT, "Casa");
        assert_eq!(p.location.municipality_name(), None);
        assert!(!p.in_municipality(MISSING_TEXT));
        assert!(!p.in_municipality("n/a"));

        let blank = listing("  ", "Casa");
        assert!(!blank.in_municipality(""));
        assert_eq!(
            listing(" Bello ", "Casa").location.municipality_name(),
            Some("Bello")
        );
    }
}
