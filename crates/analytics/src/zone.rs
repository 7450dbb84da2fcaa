use crate::error::CalculationError;
use core_types::Property;
use rust_decimal::Decimal;

/// The subject listing measured against the average of its zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneComparison {
    pub average_area_price: Decimal,
    pub price_difference_percent: Decimal,
    pub comparable_count: usize,
}

/// Selects the comparable population of `subject` out of `population`.
///
/// A comparable shares the subject's municipality (case-insensitive exact
/// match) and, when `same_type` is set, its property type. The subject itself
/// and listings that cannot be priced are left out.
pub fn comparables<'a>(
    subject: &'a Property,
    population: &'a [Property],
    same_type: bool,
) -> impl Iterator<Item = &'a Property> + 'a {
    population.iter().filter(move |candidate| {
        candidate.id != subject.id
            && candidate.in_municipality(&subject.location.municipality)
            && (!same_type || candidate.is_type(&subject.property_type))
            && candidate.is_priceable()
    })
}

/// Compares a price per area against the prices per area of the comparables.
///
/// Fails with `InsufficientData` when there is nothing to compare against;
/// callers decide whether that is fatal.
pub fn compare_to_zone(
    subject_price_per_area: Decimal,
    comparable_prices: &[Decimal],
) -> Result<ZoneComparison, CalculationError> {
    if comparable_prices.is_empty() {
        return Err(CalculationError::InsufficientData(
            "no comparable listings in the zone".to_string(),
        ));
    }

    let average_area_price = mean(comparable_prices)?;
    if average_area_price.is_zero() {
        return Err(CalculationError::DivisionByZero(
            "average price per area of the zone is 0".to_string(),
        ));
    }

    let price_difference_percent = (subject_price_per_area - average_area_price)
        .checked_div(average_area_price)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| CalculationError::Overflow("price difference percent".to_string()))?;

    Ok(ZoneComparison {
        average_area_price,
        price_difference_percent,
        comparable_count: comparable_prices.len(),
    })
}

/// Arithmetic mean. Values are summed in ascending order so the result does
/// not depend on the order the comparables were fetched in.
fn mean(values: &[Decimal]) -> Result<Decimal, CalculationError> {
    let mut sorted = values.to_vec();
    sorted.sort();

    let sum = sorted
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
        .ok_or_else(|| CalculationError::Overflow("average area price".to_string()))?;

    sum.checked_div(Decimal::from(sorted.len()))
        .ok_or_else(|| CalculationError::Overflow("average area price".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Location, PropertyId};
    use rust_decimal_macros::dec;

    fn listing(municipality: &str, property_type: &str, area: Decimal, price: Decimal) -> Property {
        Property {
            id: PropertyId::random(),
            code: "X".to_string(),
            location: Location {
                department: "Antioquia".to_string(),
                municipality: municipality.to_string(),
                neighborhood: "N/A".to_string(),
            },
            property_type: property_type.to_string(),
            area,
            list_price: price,
            features: vec![],
        }
    }

    #[test]
    fn equal_to_average_means_zero_difference() {
        let comparison = compare_to_zone(dec!(2000), &[dec!(1800), dec!(2200), dec!(2000)]).unwrap();
        assert_eq!(comparison.average_area_price, dec!(2000));
        assert_eq!(comparison.price_difference_percent, Decimal::ZERO);
        assert_eq!(comparison.comparable_count, 3);
    }

    #[test]
    fn difference_is_relative_to_the_average() {
        let comparison = compare_to_zone(dec!(2500), &[dec!(2000), dec!(2000)]).unwrap();
        assert_eq!(comparison.price_difference_percent, dec!(25));

        let comparison = compare_to_zone(dec!(1500), &[dec!(2000)]).unwrap();
        assert_eq!(comparison.price_difference_percent, dec!(-25));
    }

    #[test]
    fn empty_population_is_insufficient_data() {
        assert!(matches!(
            compare_to_zone(dec!(2000), &[]),
            Err(CalculationError::InsufficientData(_))
        ));
    }

    #[test]
    fn average_does_not_depend_on_input_order() {
        let prices = [dec!(1000) / dec!(3), dec!(2200.5), dec!(1999.99), dec!(7) / dec!(11)];
        let mut reversed = prices;
        reversed.reverse();
        let forward = compare_to_zone(dec!(1000), &prices).unwrap();
        let backward = compare_to_zone(dec!(1000), &reversed).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn comparables_exclude_subject_other_zones_and_unpriceable_listings() {
        let subject = listing("Envigado", "Apartamento", dec!(100), dec!(200000));
        let population = vec![
            subject.clone(),
            listing("ENVIGADO", "apartamento", dec!(100), dec!(180000)),
            listing("Envigado", "Casa", dec!(100), dec!(300000)),
            listing("Envigado Sur", "Apartamento", dec!(100), dec!(100000)),
            listing("Envigado", "Apartamento", Decimal::ZERO, dec!(100000)),
        ];

        let same_type: Vec<_> = comparables(&subject, &population, true).collect();
        assert_eq!(same_type.len(), 1);
        assert_eq!(same_type[0].list_price, dec!(180000));

        let any_type: Vec<_> = comparables(&subject, &population, false).collect();
        assert_eq!(any_type.len(), 2);
    }
}
