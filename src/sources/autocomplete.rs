use std::collections::HashSet;

use crate::models::{CandidateSource, RawCandidate};
use crate::pipeline::TagNormalizer;
use crate::suggest::SuggestionProvider;

/// Normalized live suggestions for one query.
///
/// Serves two purposes: the suggestions become autocomplete candidates, and
/// their lowercase forms make up the lookup set the scorer checks for
/// verbatim matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSuggestions {
    suggestions: Vec<String>,
}

impl LiveSuggestions {
    /// Normalizes raw suggestion strings, dropping those that reduce to nothing.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suggestions = raw
            .into_iter()
            .map(|s| TagNormalizer::normalize(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self { suggestions }
    }

    /// Fetches suggestions, treating every failure as "no suggestions".
    ///
    /// Suggestions are an enhancement; errors are logged and swallowed.
    pub fn fetch(provider: Option<&dyn SuggestionProvider>, query: &str, lang: &str) -> Self {
        let Some(provider) = provider else {
            return Self::default();
        };

        match provider.fetch_suggestions(query, lang) {
            Ok(raw) => Self::from_raw(raw),
            Err(e) => {
                tracing::warn!(error = %e, query, "autocomplete fetch failed, continuing without suggestions");
                Self::default()
            }
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.suggestions
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Lowercase suggestion set used for exact-match scoring.
    pub fn lookup_set(&self) -> HashSet<String> {
        self.suggestions.iter().map(|s| s.to_lowercase()).collect()
    }

    /// Suggestions as autocomplete-sourced candidates.
    pub fn candidates(&self) -> Vec<RawCandidate> {
        self.suggestions
            .iter()
            .map(|s| RawCandidate::new(s.clone(), CandidateSource::Autocomplete))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::SuggestError;

    struct FixedSuggestions(Vec<&'static str>);

    impl SuggestionProvider for FixedSuggestions {
        fn fetch_suggestions(&self, _query: &str, _lang: &str) -> Result<Vec<String>, SuggestError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct FailingSuggestions;

    impl SuggestionProvider for FailingSuggestions {
        fn fetch_suggestions(&self, _query: &str, _lang: &str) -> Result<Vec<String>, SuggestError> {
            Err(SuggestError::MalformedPayload("not json".to_string()))
        }
    }

    #[test]
    fn test_suggestions_are_normalized_and_empties_dropped() {
        let provider = FixedSuggestions(vec!["drake  type beat", "🔥", "drake &amp; future"]);
        let live = LiveSuggestions::fetch(Some(&provider), "drake", "en");

        assert_eq!(live.as_slice(), &["drake type beat", "drake & future"]);
    }

    #[test]
    fn test_failure_yields_empty_suggestions() {
        let live = LiveSuggestions::fetch(Some(&FailingSuggestions), "drake", "en");
        assert!(live.is_empty());
    }

    #[test]
    fn test_missing_provider_yields_empty_suggestions() {
        let live = LiveSuggestions::fetch(None, "drake", "en");
        assert_eq!(live, LiveSuggestions::default());
    }

    #[test]
    fn test_lookup_set_is_lowercase() {
        let live = LiveSuggestions::from_raw(["Drake Type Beat"]);
        assert!(live.lookup_set().contains("drake type beat"));
        assert!(!live.lookup_set().contains("Drake Type Beat"));
    }

    #[test]
    fn test_candidates_are_autocomplete_sourced() {
        let live = LiveSuggestions::from_raw(["drake type beat", "drake instrumental"]);
        let candidates = live.candidates();

        assert_eq!(candidates.len(), 2);
        assert!(
            candidates
                .iter()
                .all(|c| c.source == CandidateSource::Autocomplete)
        );
    }
}
