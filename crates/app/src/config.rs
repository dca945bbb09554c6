use std::path::PathBuf;
use std::time::Duration;

use services::ADVANCE_DELAY;

/// Front-end settings, resolved from the environment and then from flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON catalog to load; the bundled one when unset.
    pub catalog: Option<PathBuf>,
    /// Directory flag images are resolved against; images are not checked when unset.
    pub assets_dir: Option<PathBuf>,
    /// Raw region preference, e.g. `All` or `North_America`.
    pub region: Option<String>,
    /// Raw choice-count preference, e.g. `4`.
    pub choices: Option<String>,
    pub advance_delay: Duration,
    pub seed: Option<u64>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            assets_dir: None,
            region: None,
            choices: None,
            advance_delay: ADVANCE_DELAY,
            seed: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            catalog: lookup("FLAG_QUIZ_CATALOG").map(PathBuf::from),
            assets_dir: lookup("FLAG_QUIZ_ASSETS").map(PathBuf::from),
            region: lookup("FLAG_QUIZ_REGION"),
            choices: lookup("FLAG_QUIZ_CHOICES"),
            advance_delay: lookup("FLAG_QUIZ_ADVANCE_MS")
                .and_then(|v| v.parse().ok())
                .map_or(default.advance_delay, Duration::from_millis),
            seed: lookup("FLAG_QUIZ_SEED").and_then(|v| v.parse().ok()),
            log_filter: lookup("FLAG_QUIZ_LOG").unwrap_or(default.log_filter),
        }
    }
}
