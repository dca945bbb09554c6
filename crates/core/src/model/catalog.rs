use std::collections::HashSet;
use std::sync::Arc;

use crate::model::config::RegionFilter;
use crate::model::country::Country;

/// Immutable list of countries the quiz draws from.
///
/// Cloning is cheap; all clones share the same backing slice.
#[derive(Debug, Clone)]
pub struct Catalog {
    countries: Arc<[Country]>,
}

impl Catalog {
    #[must_use]
    pub fn new(countries: Vec<Country>) -> Self {
        Self {
            countries: countries.into(),
        }
    }

    #[must_use]
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Country> {
        self.countries.iter().find(|country| country.name() == name)
    }

    /// Countries eligible as correct answers under `filter`, first occurrence
    /// of each name only.
    #[must_use]
    pub fn eligible(&self, filter: &RegionFilter) -> Vec<&Country> {
        let mut seen = HashSet::new();
        self.countries
            .iter()
            .filter(|country| filter.matches(country.region()))
            .filter(|country| seen.insert(country.name()))
            .collect()
    }

    /// Distinct names across the whole catalog, in catalog order.
    #[must_use]
    pub fn distinct_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.countries
            .iter()
            .map(Country::name)
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Country>> for Catalog {
    fn from(countries: Vec<Country>) -> Self {
        Self::new(countries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::country::Region;

    fn country(name: &str, region: Region) -> Country {
        Country::new(name, region, format!("{name}.png")).unwrap()
    }

    #[test]
    fn eligible_applies_region_and_dedupes() {
        let catalog = Catalog::new(vec![
            country("Fiji", Region::Oceania),
            country("Chad", Region::Africa),
            country("Fiji", Region::Oceania),
            country("Tonga", Region::Oceania),
        ]);

        let oceania = catalog.eligible(&RegionFilter::Only(Region::Oceania));
        let names: Vec<_> = oceania.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Fiji", "Tonga"]);

        assert_eq!(catalog.eligible(&RegionFilter::All).len(), 3);
        assert_eq!(catalog.distinct_names(), vec!["Fiji", "Chad", "Tonga"]);
    }

    #[test]
    fn clones_share_storage() {
        let catalog = Catalog::new(vec![country("Peru", Region::SouthAmerica)]);
        let other = catalog.clone();
        assert!(std::ptr::eq(catalog.countries(), other.countries()));
        assert_eq!(other.find("Peru").map(Country::region), Some(Region::SouthAmerica));
    }
}
