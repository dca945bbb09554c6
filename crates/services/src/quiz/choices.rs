use rand::Rng;
use rand::seq::index;

use quiz_core::model::{Catalog, Country};

use crate::error::QuizError;

/// Picks the answer buttons for a question.
///
/// Decoys come from the whole catalog; the region filter only limits which
/// countries are asked about.
pub struct ChoiceGenerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> ChoiceGenerator<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Check that `num_choices` distinct names can be produced.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientCatalog` if the catalog is too small.
    pub fn ensure_capacity(&self, num_choices: u8) -> Result<(), QuizError> {
        let available = self.catalog.distinct_names().len();
        let required = usize::from(num_choices);
        if available < required {
            return Err(QuizError::InsufficientCatalog {
                required,
                available,
            });
        }
        Ok(())
    }

    /// Produce `num_choices` distinct names: the correct one at a uniformly
    /// random slot, the rest sampled without replacement from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientCatalog` if the catalog (together with
    /// the correct name) has fewer than `num_choices` distinct names.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        correct: &Country,
        num_choices: u8,
        rng: &mut R,
    ) -> Result<Vec<String>, QuizError> {
        let required = usize::from(num_choices);
        let decoy_pool: Vec<&str> = self
            .catalog
            .distinct_names()
            .into_iter()
            .filter(|name| *name != correct.name())
            .collect();

        let available = decoy_pool.len() + 1;
        if required == 0 || available < required {
            return Err(QuizError::InsufficientCatalog {
                required,
                available,
            });
        }

        let mut choices: Vec<String> = index::sample(rng, decoy_pool.len(), required - 1)
            .into_iter()
            .map(|i| decoy_pool[i].to_string())
            .collect();
        let slot = rng.random_range(0..required);
        choices.insert(slot, correct.name().to_string());

        Ok(choices)
    }
}

/// One answer button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSlot {
    pub name: String,
    pub enabled: bool,
}

/// The answer buttons for the current question, as plain data.
///
/// A wrong guess disables its own slot; a right guess disables them all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSlots {
    slots: Vec<ChoiceSlot>,
}

impl ChoiceSlots {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self {
            slots: names
                .into_iter()
                .map(|name| ChoiceSlot {
                    name,
                    enabled: true,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn slots(&self) -> &[ChoiceSlot] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.name.as_str()).collect()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ChoiceSlot> {
        self.slots.get(index)
    }

    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.enabled && slot.name == name)
    }

    /// Enabled slot whose label matches `name`, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn find_enabled(&self, name: &str) -> Option<&ChoiceSlot> {
        let wanted = name.trim().to_lowercase();
        self.slots
            .iter()
            .find(|slot| slot.enabled && slot.name.to_lowercase() == wanted)
    }

    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.enabled).count()
    }

    /// Returns true when a matching enabled slot was found.
    pub fn disable(&mut self, name: &str) -> bool {
        let mut changed = false;
        for slot in self.slots.iter_mut().filter(|slot| slot.name == name) {
            changed |= slot.enabled;
            slot.enabled = false;
        }
        changed
    }

    pub fn disable_all(&mut self) {
        for slot in &mut self.slots {
            slot.enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Region;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn country(name: &str) -> Country {
        Country::new(name, Region::Europe, format!("{name}.png")).unwrap()
    }

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(names.iter().map(|name| country(name)).collect())
    }

    #[test]
    fn output_has_correct_once_and_distinct_decoys() {
        let catalog = catalog(&[
            "Austria", "Belgium", "Denmark", "Finland", "France", "Germany", "Greece", "Italy",
        ]);
        let correct = country("Greece");
        let mut rng = StdRng::seed_from_u64(7);

        for num_choices in 2..=8 {
            let choices = ChoiceGenerator::new(&catalog)
                .generate(&correct, num_choices, &mut rng)
                .unwrap();
            assert_eq!(choices.len(), usize::from(num_choices));
            assert_eq!(choices.iter().filter(|c| *c == "Greece").count(), 1);
            let unique: HashSet<_> = choices.iter().collect();
            assert_eq!(unique.len(), choices.len());
        }
    }

    #[test]
    fn duplicate_catalog_names_never_repeat() {
        let catalog = catalog(&["Chad", "Chad", "Chad", "Mali", "Mali", "Togo"]);
        let correct = country("Togo");
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let choices = ChoiceGenerator::new(&catalog)
                .generate(&correct, 3, &mut rng)
                .unwrap();
            let unique: HashSet<_> = choices.iter().collect();
            assert_eq!(unique.len(), 3);
        }
    }

    #[test]
    fn too_few_distinct_names_fails() {
        let catalog = catalog(&["Chad", "Chad", "Mali"]);
        let err = ChoiceGenerator::new(&catalog)
            .generate(&country("Mali"), 4, &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::InsufficientCatalog {
                required: 4,
                available: 2
            }
        ));
        assert!(ChoiceGenerator::new(&catalog).ensure_capacity(3).is_err());
        assert!(ChoiceGenerator::new(&catalog).ensure_capacity(2).is_ok());
    }

    #[test]
    fn correct_slot_is_uniform() {
        let catalog = catalog(&[
            "Austria", "Belgium", "Denmark", "Finland", "France", "Germany", "Greece", "Italy",
            "Norway", "Poland",
        ]);
        let correct = country("Poland");
        let generator = ChoiceGenerator::new(&catalog);
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 8_000;
        let mut hits = [0_u32; 4];

        for _ in 0..trials {
            let choices = generator.generate(&correct, 4, &mut rng).unwrap();
            let slot = choices.iter().position(|c| c == "Poland").unwrap();
            hits[slot] += 1;
        }

        let expected = f64::from(trials) / 4.0;
        for count in hits {
            let deviation = (f64::from(count) - expected).abs() / expected;
            assert!(deviation < 0.08, "slot counts {hits:?} are not uniform");
        }
    }

    #[test]
    fn slots_track_disabled_choices() {
        let mut slots = ChoiceSlots::new(vec!["Peru".into(), "Chile".into(), "Bolivia".into()]);
        assert_eq!(slots.enabled_count(), 3);

        assert!(slots.disable("Chile"));
        assert!(!slots.disable("Chile"));
        assert!(!slots.is_enabled("Chile"));
        assert!(slots.is_enabled("Peru"));

        slots.disable_all();
        assert_eq!(slots.enabled_count(), 0);
        assert_eq!(slots.names(), vec!["Peru", "Chile", "Bolivia"]);
    }

    #[test]
    fn find_enabled_ignores_case_and_ruled_out_slots() {
        let mut slots = ChoiceSlots::new(vec!["Peru".into(), "Chile".into()]);
        assert_eq!(slots.find_enabled(" peru ").map(|s| s.name.as_str()), Some("Peru"));

        slots.disable("Chile");
        assert!(slots.find_enabled("CHILE").is_none());
        assert!(slots.find_enabled("Bolivia").is_none());
    }
}
