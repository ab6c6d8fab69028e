use serde::{Deserialize, Serialize};

use super::CandidateSource;

/// Unprocessed candidate text as emitted by a sourcing adapter.
///
/// The text has not been normalized or spam-filtered yet; merging turns
/// raw candidates into [`TagCandidate`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub text: String,
    pub source: CandidateSource,
    pub category: Option<String>,
}

impl RawCandidate {
    /// Creates a raw candidate without a category.
    pub fn new(text: impl Into<String>, source: CandidateSource) -> Self {
        Self {
            text: text.into(),
            source,
            category: None,
        }
    }

    /// Attaches the category reported by the producing source.
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }
}

/// A single proposed tag living for the duration of one generation run.
///
/// `text` is always in canonical form and non-empty once a candidate has
/// been produced by merging. `score` stays at `0.0` until the scorer runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagCandidate {
    pub text: String,
    pub source: CandidateSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub score: f64,
}

impl TagCandidate {
    /// Creates an unscored candidate.
    ///
    /// # Examples
    ///
    /// ```
    /// use beattag::{CandidateSource, TagCandidate};
    ///
    /// let candidate = TagCandidate::new("drake type beat", CandidateSource::Template);
    /// assert_eq!(candidate.text, "drake type beat");
    /// assert_eq!(candidate.score, 0.0);
    /// assert!(candidate.category.is_none());
    /// ```
    pub fn new(text: impl Into<String>, source: CandidateSource) -> Self {
        Self {
            text: text.into(),
            source,
            category: None,
            score: 0.0,
        }
    }

    /// Sets the category carried through from the generative source.
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Sets the relevance score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Lowercase key used for case-insensitive deduplication.
    pub fn key(&self) -> String {
        self.text.to_lowercase()
    }

    /// Length in characters, as counted against the tag budget.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
