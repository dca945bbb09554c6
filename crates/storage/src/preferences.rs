use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use quiz_core::model::{QuizConfigDraft, QuizConfiguration};

/// Key holding the region filter, stored with underscores (`North_America`).
pub const PREF_REGIONS: &str = "pref_regions";
/// Key holding the number of answer buttons as a decimal string.
pub const PREF_CHOICES: &str = "pref_numberOfChoices";

/// Key/value settings store the quiz reads its configuration from.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);

    /// Raw quiz settings as currently stored.
    fn quiz_draft(&self) -> QuizConfigDraft {
        QuizConfigDraft {
            region: self.get(PREF_REGIONS),
            num_choices: self.get(PREF_CHOICES),
        }
    }

    /// Store an already validated configuration in its raw form.
    fn store_quiz_config(&self, config: &QuizConfiguration) {
        self.set(PREF_REGIONS, config.region().storage_key());
        self.set(PREF_CHOICES, config.num_choices().to_string());
    }
}

/// Simple in-memory store for tests and the terminal front end.
#[derive(Clone, Default)]
pub struct InMemoryPreferenceStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        let guard = self
            .values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut guard = self
            .values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.insert(key.to_string(), value);
    }
}
