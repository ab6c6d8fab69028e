use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance of a tag candidate.
///
/// Distinguishes live autocomplete data, language-model output and
/// mechanically constructed template variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    /// Suggestion typed by real searchers, fetched from the autocomplete endpoint.
    Autocomplete,
    /// Candidate proposed by the generative text provider.
    Generated,
    /// Deterministic query variant built from modifier words.
    Template,
}

impl CandidateSource {
    /// Flat score bonus reflecting how much this source is trusted.
    pub fn score_bonus(self) -> f64 {
        match self {
            Self::Autocomplete => 0.25,
            Self::Template => 0.05,
            Self::Generated => 0.0,
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Autocomplete => write!(f, "autocomplete"),
            Self::Generated => write!(f, "generated"),
            Self::Template => write!(f, "template"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&CandidateSource::Autocomplete).unwrap(),
            r#""autocomplete""#
        );
        assert_eq!(
            serde_json::to_string(&CandidateSource::Generated).unwrap(),
            r#""generated""#
        );

        let template: CandidateSource = serde_json::from_str(r#""template""#).unwrap();
        assert_eq!(template, CandidateSource::Template);
    }

    #[test]
    fn deserialization_fails_on_unknown_variant() {
        let result: Result<CandidateSource, _> = serde_json::from_str(r#""yt_suggest""#);
        assert!(result.is_err());
    }

    #[test]
    fn display_matches_serialized_name() {
        for source in [
            CandidateSource::Autocomplete,
            CandidateSource::Generated,
            CandidateSource::Template,
        ] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json.trim_matches('"'), source.to_string());
        }
    }

    #[test]
    fn bonuses_follow_trust_order() {
        assert_eq!(CandidateSource::Autocomplete.score_bonus(), 0.25);
        assert_eq!(CandidateSource::Template.score_bonus(), 0.05);
        assert_eq!(CandidateSource::Generated.score_bonus(), 0.0);
    }
}
