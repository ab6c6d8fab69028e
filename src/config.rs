//! Generation settings with environment overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::{
    DEFAULT_CHAR_BUDGET, DEFAULT_CURRENT_YEARS, DEFAULT_DIVERSITY_WEIGHT,
    DEFAULT_SELECTION_WINDOW, SelectionParams,
};
use crate::sources::{DEFAULT_FALLBACK_LIMIT, DEFAULT_GENERATED_LIMIT};

/// Tags below this count are considered an under-filled run.
pub const DEFAULT_MIN_TAG_COUNT: usize = 25;

/// Language passed to the suggestion provider by default.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Settings for one tag generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub diversity_weight: f64,
    pub char_budget: usize,
    pub selection_window: usize,
    /// Advisory only: runs selecting fewer tags are logged.
    pub min_tag_count: usize,
    pub language: String,
    /// Candidates requested from the generative provider.
    pub generated_limit: usize,
    /// Cap on candidates recovered from an unstructured completion.
    pub fallback_limit: usize,
    /// Year tokens, most recent first. The first one feeds the dated template.
    pub current_years: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            diversity_weight: DEFAULT_DIVERSITY_WEIGHT,
            char_budget: DEFAULT_CHAR_BUDGET,
            selection_window: DEFAULT_SELECTION_WINDOW,
            min_tag_count: DEFAULT_MIN_TAG_COUNT,
            language: DEFAULT_LANGUAGE.to_string(),
            generated_limit: DEFAULT_GENERATED_LIMIT,
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
            current_years: DEFAULT_CURRENT_YEARS
                .iter()
                .map(|y| y.to_string())
                .collect(),
        }
    }
}

impl GeneratorConfig {
    /// Loads defaults overridden by `BEATTAG_*` environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for unparsable or out-of-range values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads defaults overridden by values from `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for unparsable or out-of-range values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("BEATTAG_DIVERSITY_WEIGHT") {
            config.diversity_weight = parse_value("BEATTAG_DIVERSITY_WEIGHT", &v)?;
        }
        if let Some(v) = lookup("BEATTAG_CHAR_BUDGET") {
            config.char_budget = parse_value("BEATTAG_CHAR_BUDGET", &v)?;
        }
        if let Some(v) = lookup("BEATTAG_SELECTION_WINDOW") {
            config.selection_window = parse_value("BEATTAG_SELECTION_WINDOW", &v)?;
        }
        if let Some(v) = lookup("BEATTAG_MIN_TAG_COUNT") {
            config.min_tag_count = parse_value("BEATTAG_MIN_TAG_COUNT", &v)?;
        }
        if let Some(v) = lookup("BEATTAG_GENERATED_LIMIT") {
            config.generated_limit = parse_value("BEATTAG_GENERATED_LIMIT", &v)?;
        }
        if let Some(v) = lookup("BEATTAG_LANGUAGE") {
            let lang = v.trim();
            if lang.is_empty() {
                return Err(ConfigError::invalid(
                    "BEATTAG_LANGUAGE",
                    &v,
                    "must not be empty",
                ));
            }
            config.language = lang.to_string();
        }
        if let Some(v) = lookup("BEATTAG_YEARS") {
            let years: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|y| !y.is_empty())
                .map(String::from)
                .collect();
            if years.is_empty() {
                return Err(ConfigError::invalid(
                    "BEATTAG_YEARS",
                    &v,
                    "expected a comma separated list of years",
                ));
            }
            config.current_years = years;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that the selector would otherwise panic on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.diversity_weight) {
            return Err(ConfigError::invalid(
                "diversity_weight",
                &self.diversity_weight.to_string(),
                "must be within [0, 1]",
            ));
        }
        if self.char_budget == 0 {
            return Err(ConfigError::invalid("char_budget", "0", "must be positive"));
        }
        if self.selection_window == 0 {
            return Err(ConfigError::invalid(
                "selection_window",
                "0",
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Year used by the dated template variant.
    pub fn template_year(&self) -> &str {
        self.current_years
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_CURRENT_YEARS[0])
    }

    pub fn selection_params(&self) -> SelectionParams {
        SelectionParams {
            diversity_weight: self.diversity_weight,
            char_budget: self.char_budget,
            window: self.selection_window,
        }
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, value, e.to_string()))
}
