use crate::DbError;
use core_types::{Location, MISSING_TEXT, Property, PropertyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use sqlx::FromRow;

/// A listing as it comes out of storage, with every field optional.
///
/// Listings were captured as loosely shaped documents, so any field may be
/// absent. The serde names are the keys used by the document export; the
/// struct field names are the column names of the `listings` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, FromRow)]
pub struct ListingRecord {
    #[serde(rename = "_id", default, deserialize_with = "document_id")]
    pub listing_id: Option<String>,
    #[serde(rename = "Codigo")]
    pub code: Option<String>,
    #[serde(rename = "Departamento")]
    pub department: Option<String>,
    #[serde(rename = "Municipio")]
    pub municipality: Option<String>,
    #[serde(rename = "Barrio")]
    pub neighborhood: Option<String>,
    #[serde(rename = "Tipo")]
    pub property_type: Option<String>,
    #[serde(rename = "Area")]
    pub area: Option<Decimal>,
    #[serde(rename = "Precio de lista")]
    pub list_price: Option<Decimal>,
    #[serde(rename = "Caracteristicas")]
    pub features: Option<Vec<String>>,
}

/// Document exports write ids either as plain strings or in extended JSON,
/// `{"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentId {
    Plain(String),
    Extended {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

fn document_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<DocumentId>::deserialize(deserializer)?;
    Ok(id.map(|id| match id {
        DocumentId::Plain(id) | DocumentId::Extended { oid: id } => id,
    }))
}

/// Fills defaults once, at the storage boundary.
///
/// Missing text becomes `"N/A"`, missing numbers become 0 (the calculators
/// reject those with a validation error) and missing features become empty.
/// The id is the one field without a default: a record without one could
/// never be looked up again, so it is rejected.
impl TryFrom<ListingRecord> for Property {
    type Error = DbError;

    fn try_from(record: ListingRecord) -> Result<Self, Self::Error> {
        let id = record
            .listing_id
            .as_deref()
            .and_then(|id| PropertyId::new(id).ok())
            .ok_or_else(|| {
                DbError::InvalidRecord(format!(
                    "listing {} has no id",
                    record.code.as_deref().unwrap_or(MISSING_TEXT)
                ))
            })?;
        let text = |value: Option<String>| value.unwrap_or_else(|| MISSING_TEXT.to_string());

        Ok(Property {
            id,
            code: text(record.code),
            location: Location {
                department: text(record.department),
                municipality: text(record.municipality),
                neighborhood: text(record.neighborhood),
            },
            property_type: text(record.property_type),
            area: record.area.unwrap_or_default(),
            list_price: record.list_price.unwrap_or_default(),
            features: record.features.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_fields_get_defaults() {
        let property = Property::try_from(ListingRecord {
            listing_id: Some("65a1f0c2e4b0a1b2c3d4e5f6".to_string()),
            municipality: Some("Envigado".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(property.id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(property.code, MISSING_TEXT);
        assert_eq!(property.location.municipality, "Envigado");
        assert_eq!(property.location.neighborhood, MISSING_TEXT);
        assert_eq!(property.area, Decimal::ZERO);
        assert_eq!(property.list_price, Decimal::ZERO);
        assert!(property.features.is_empty());
        assert!(!property.is_priceable());
    }

    #[test]
    fn record_without_id_is_rejected() {
        let record = ListingRecord {
            code: Some("V-9".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Property::try_from(record.clone()),
            Err(DbError::InvalidRecord(msg)) if msg.contains("V-9")
        ));

        let blank = ListingRecord {
            listing_id: Some("  ".to_string()),
            ..record
        };
        assert!(Property::try_from(blank).is_err());
    }

    #[test]
    fn parses_document_keys() {
        let json = r#"{
            "_id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "Codigo": "V-204",
            "Departamento": "Antioquia",
            "Municipio": "Envigado",
            "Barrio": "Zuñiga",
            "Tipo": "Apartamento",
            "Area": 100,
            "Precio de lista": 200000,
            "Caracteristicas": ["Balcón", "Parqueadero"]
        }"#;
        let record = serde_json::from_str::<ListingRecord>(json).unwrap();
        let property = Property::try_from(record).unwrap();

        assert_eq!(property.id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(property.code, "V-204");
        assert_eq!(property.location.neighborhood, "Zuñiga");
        assert_eq!(property.property_type, "Apartamento");
        assert_eq!(property.area, dec!(100));
        assert_eq!(property.list_price, dec!(200000));
        assert_eq!(property.features, vec!["Balcón", "Parqueadero"]);
    }

    #[test]
    fn parses_extended_json_object_ids() {
        let json = r#"{"_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"}, "Municipio": "Bello"}"#;
        let record = serde_json::from_str::<ListingRecord>(json).unwrap();
        assert_eq!(record.listing_id.as_deref(), Some("65a1f0c2e4b0a1b2c3d4e5f6"));

        let record = serde_json::from_str::<ListingRecord>(r#"{"Municipio": "Bello"}"#).unwrap();
        assert_eq!(record.listing_id, None);
    }
}
