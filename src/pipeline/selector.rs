//! Diversity-aware tag selection under a character budget.
//!
//! Greedy Maximal Marginal Relevance: each step picks the candidate with
//! the best trade-off between its own score and its token overlap with the
//! tags already chosen, until the budget is spent.

use std::collections::HashSet;

use crate::models::TagCandidate;

use super::similarity::{jaccard, token_set};

/// Default weight of score versus redundancy.
pub const DEFAULT_DIVERSITY_WEIGHT: f64 = 0.78;

/// Default character budget, just under the platform's 500 character limit.
pub const DEFAULT_CHAR_BUDGET: usize = 495;

/// Default number of top-scored pool members considered per step.
pub const DEFAULT_SELECTION_WINDOW: usize = 120;

/// Selection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionParams {
    /// `1.0` selects purely by score, `0.0` purely against redundancy.
    pub diversity_weight: f64,
    /// Maximum of summed tag lengths plus one separator between tags.
    pub char_budget: usize,
    /// Pool members considered per step.
    pub window: usize,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            diversity_weight: DEFAULT_DIVERSITY_WEIGHT,
            char_budget: DEFAULT_CHAR_BUDGET,
            window: DEFAULT_SELECTION_WINDOW,
        }
    }
}

/// Result of a selection: tags in selection order and the characters used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub tags: Vec<String>,
    pub total_chars: usize,
}

struct PoolEntry {
    candidate: TagCandidate,
    tokens: HashSet<String>,
    key: String,
}

/// Selects tags with the default window of 120.
///
/// # Panics
///
/// Panics if `char_budget` is zero or `diversity_weight` is not within `[0, 1]`.
///
/// # Examples
///
/// ```
/// use beattag::pipeline::select;
/// use beattag::{CandidateSource, TagCandidate};
///
/// let candidates = vec![
///     TagCandidate::new("drake type beat", CandidateSource::Template).with_score(1.0),
///     TagCandidate::new("drake type beat 2025", CandidateSource::Template).with_score(0.9),
///     TagCandidate::new("toronto rnb", CandidateSource::Generated).with_score(0.8),
/// ];
///
/// let tags = select(candidates, 0.78, 495);
/// assert_eq!(tags[0], "drake type beat");
/// assert_eq!(tags.len(), 3);
/// ```
pub fn select(
    candidates: Vec<TagCandidate>,
    diversity_weight: f64,
    char_budget: usize,
) -> Vec<String> {
    select_with(
        candidates,
        SelectionParams {
            diversity_weight,
            char_budget,
            window: DEFAULT_SELECTION_WINDOW,
        },
    )
    .tags
}

/// Greedy MMR selection under a character budget.
///
/// Candidates are stably sorted by descending score. At each step only the
/// first `window` pool members are considered; the one maximising
/// `w * score - (1 - w) * redundancy` wins, where redundancy is the highest
/// Jaccard overlap with any selected tag. Ties go to the earlier candidate.
/// A winner that does not fit the remaining budget is dropped from the pool
/// for good. Selection stops when the pool is empty, the budget is reached,
/// or every considered candidate duplicates an already selected tag.
///
/// # Panics
///
/// Panics if `char_budget` or `window` is zero, or if `diversity_weight`
/// is NaN or outside `[0, 1]`.
pub fn select_with(candidates: Vec<TagCandidate>, params: SelectionParams) -> Selection {
    assert!(params.char_budget > 0, "character budget must be positive");
    assert!(params.window > 0, "selection window must be positive");
    assert!(
        (0.0..=1.0).contains(&params.diversity_weight),
        "diversity weight must be within [0, 1], got {}",
        params.diversity_weight
    );

    let mut pool: Vec<PoolEntry> = candidates
        .into_iter()
        .map(|candidate| PoolEntry {
            tokens: token_set(&candidate.text),
            key: candidate.key(),
            candidate,
        })
        .collect();
    pool.sort_by(|a, b| b.candidate.score.total_cmp(&a.candidate.score));

    let weight = params.diversity_weight;
    let mut selected: Vec<String> = Vec::new();
    let mut selected_tokens: Vec<HashSet<String>> = Vec::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut total_chars = 0usize;

    while !pool.is_empty() && total_chars < params.char_budget {
        let mut best: Option<(usize, f64)> = None;

        for (idx, entry) in pool.iter().take(params.window).enumerate() {
            if used.contains(&entry.key) {
                continue;
            }
            let redundancy = selected_tokens
                .iter()
                .map(|tokens| jaccard(&entry.tokens, tokens))
                .fold(0.0, f64::max);
            let mmr = weight * entry.candidate.score - (1.0 - weight) * redundancy;

            if best.is_none_or(|(_, best_mmr)| mmr > best_mmr) {
                best = Some((idx, mmr));
            }
        }

        let Some((pick, _)) = best else {
            break;
        };

        let entry = pool.remove(pick);
        let separator = usize::from(!selected.is_empty());
        let additional = entry.candidate.char_len() + separator;
        if total_chars + additional > params.char_budget {
            continue;
        }

        total_chars += additional;
        used.insert(entry.key);
        selected_tokens.push(entry.tokens);
        selected.push(entry.candidate.text);
    }

    Selection {
        tags: selected,
        total_chars,
    }
}
