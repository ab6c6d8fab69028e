//! Tag candidate pipeline: normalize, filter, merge, score and select.
//!
//! # Examples
//!
//! ```
//! use beattag::pipeline::TagGeneratorBuilder;
//!
//! // Without providers the run is template-only and fully offline.
//! let generator = TagGeneratorBuilder::new().build();
//! let tags = generator.generate_tags("lil uzi vert");
//!
//! assert!(tags.contains(&"lil uzi vert type beat".to_string()));
//! ```

mod generator;
mod merge;
mod normalizer;
mod scorer;
mod selector;
mod similarity;
mod spam;

pub use generator::{GenerationRun, TagGenerator, TagGeneratorBuilder, generate_tags};
pub use merge::{MergeStats, merge_candidates};
pub use normalizer::{ALLOWED_PUNCTUATION, TagNormalizer, is_accepted_char};
pub use scorer::{
    DEFAULT_CURRENT_YEARS, LIVE_SUGGESTION_BONUS, POWER_TERM_WEIGHT, POWER_TERMS, SPAM_PENALTY,
    SIMILARITY_WEIGHT, Scorer, YEAR_WEIGHT, length_penalty, score_candidate,
};
pub use selector::{
    DEFAULT_CHAR_BUDGET, DEFAULT_DIVERSITY_WEIGHT, DEFAULT_SELECTION_WINDOW, Selection,
    SelectionParams, select, select_with,
};
pub use similarity::{jaccard, token_set, tokenize};
pub use spam::{MAX_TAG_CHARS, REPETITION_WORD_THRESHOLD, is_spammy};
