//! Multi-factor relevance scoring for tag candidates.
//!
//! The weights are fixed; they encode the trust ordering between signals
//! rather than being knobs to tune per run.

use std::collections::HashSet;

use crate::models::TagCandidate;

use super::similarity::{jaccard, token_set};
use super::spam::is_spammy;

/// High-intent phrases searched together with type beats.
pub const POWER_TERMS: [&str; 10] = [
    "type beat",
    "instrumental",
    "beat",
    "free",
    "free for profit",
    "hard",
    "dark",
    "melodic",
    "with hook",
    "aggressive",
];

/// Year tokens used when no explicit list is configured.
pub const DEFAULT_CURRENT_YEARS: [&str; 2] = ["2025", "2024"];

pub const SIMILARITY_WEIGHT: f64 = 0.6;
pub const LIVE_SUGGESTION_BONUS: f64 = 0.9;
pub const POWER_TERM_WEIGHT: f64 = 0.05;
pub const YEAR_WEIGHT: f64 = 0.03;
pub const SPAM_PENALTY: f64 = 0.25;

/// Penalty for tags with many words.
pub fn length_penalty(word_count: usize) -> f64 {
    if word_count >= 12 {
        0.20
    } else if word_count >= 10 {
        0.10
    } else {
        0.0
    }
}

/// Scores candidates against one query and one set of live suggestions.
///
/// Built once per generation run; scoring itself is pure.
#[derive(Debug, Clone)]
pub struct Scorer {
    query_tokens: HashSet<String>,
    live_suggestions: HashSet<String>,
    years: Vec<String>,
}

impl Scorer {
    /// Creates a scorer from the query's token set and the live suggestion set.
    ///
    /// Suggestions are matched case-insensitively, so they are lowercased here.
    pub fn new(query_tokens: HashSet<String>, live_suggestions: HashSet<String>) -> Self {
        Self {
            query_tokens,
            live_suggestions: live_suggestions
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect(),
            years: DEFAULT_CURRENT_YEARS.iter().map(|y| y.to_string()).collect(),
        }
    }

    /// Creates a scorer for a raw query string.
    pub fn for_query<I, S>(query: &str, live_suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            token_set(query),
            live_suggestions.into_iter().map(Into::into).collect(),
        )
    }

    /// Replaces the year tokens counted as year hits.
    pub fn with_years(mut self, years: Vec<String>) -> Self {
        self.years = years;
        self
    }

    /// Returns true if `text` is, verbatim apart from case, a live suggestion.
    pub fn is_live_suggestion(&self, text: &str) -> bool {
        self.live_suggestions.contains(&text.to_lowercase())
    }

    /// Computes the relevance score of a candidate. Never negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use beattag::pipeline::Scorer;
    /// use beattag::{CandidateSource, TagCandidate};
    ///
    /// let scorer = Scorer::for_query("drake type beat", ["drake type beat"]);
    /// let candidate = TagCandidate::new("drake type beat", CandidateSource::Generated);
    ///
    /// // similarity 1.0, live suggestion, "type beat" and "beat" power terms
    /// let score = scorer.score(&candidate);
    /// assert!((score - (0.6 + 0.9 + 0.10)).abs() < 1e-9);
    /// ```
    pub fn score(&self, candidate: &TagCandidate) -> f64 {
        let text = candidate.text.to_lowercase();

        let similarity = jaccard(&token_set(&text), &self.query_tokens);
        let in_suggestions = self.live_suggestions.contains(&text);
        let power_hits = POWER_TERMS.iter().filter(|t| text.contains(*t)).count();
        let year_hits = self
            .years
            .iter()
            .filter(|y| text.contains(y.as_str()))
            .count();
        let word_count = text.split_whitespace().count();

        let spam_penalty = if is_spammy(&candidate.text) {
            SPAM_PENALTY
        } else {
            0.0
        };
        let suggestion_bonus = if in_suggestions {
            LIVE_SUGGESTION_BONUS
        } else {
            0.0
        };

        let score = SIMILARITY_WEIGHT * similarity
            + suggestion_bonus
            + POWER_TERM_WEIGHT * power_hits as f64
            + YEAR_WEIGHT * year_hits as f64
            - length_penalty(word_count)
            - spam_penalty
            + candidate.source.score_bonus();

        score.max(0.0)
    }

    /// Scores every candidate in place.
    pub fn score_all(&self, candidates: &mut [TagCandidate]) {
        for candidate in candidates.iter_mut() {
            candidate.score = self.score(candidate);
        }
    }
}

/// Scores a single candidate with the default year tokens.
pub fn score_candidate(
    candidate: &TagCandidate,
    query_tokens: &HashSet<String>,
    live_suggestions: &HashSet<String>,
) -> f64 {
    Scorer::new(query_tokens.clone(), live_suggestions.clone()).score(candidate)
}
