use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::models::{RawCandidate, TagCandidate};

use super::normalizer::TagNormalizer;
use super::spam::is_spammy;

/// Counts of candidates dropped while merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub empty: usize,
    pub spam: usize,
    pub duplicate: usize,
}

/// Merges candidate batches into one deduplicated, canonical pool.
///
/// Batches are consumed in the order given; that order is the priority
/// order. Each candidate is normalized and spam-filtered before insertion,
/// and the pool is keyed by lowercase text, so the first batch to produce a
/// key keeps its source and category while later duplicates are dropped.
/// The returned pool preserves first-insertion order.
///
/// # Examples
///
/// ```
/// use beattag::pipeline::merge_candidates;
/// use beattag::{CandidateSource, RawCandidate};
///
/// let generated = vec![RawCandidate::new("Drake Type Beat", CandidateSource::Generated)];
/// let template = vec![RawCandidate::new("drake type beat", CandidateSource::Template)];
///
/// let (pool, stats) = merge_candidates([generated, template]);
/// assert_eq!(pool.len(), 1);
/// assert_eq!(pool[0].source, CandidateSource::Generated);
/// assert_eq!(stats.duplicate, 1);
/// ```
pub fn merge_candidates<I>(batches: I) -> (Vec<TagCandidate>, MergeStats)
where
    I: IntoIterator<Item = Vec<RawCandidate>>,
{
    let mut merged: IndexMap<String, TagCandidate> = IndexMap::new();
    let mut stats = MergeStats::default();

    for raw in batches.into_iter().flatten() {
        let text = TagNormalizer::normalize(&raw.text);
        if text.is_empty() {
            tracing::debug!(raw = %raw.text, source = %raw.source, "dropping candidate that normalizes to nothing");
            stats.empty += 1;
            continue;
        }
        if is_spammy(&text) {
            tracing::debug!(tag = %text, source = %raw.source, "dropping spammy candidate");
            stats.spam += 1;
            continue;
        }

        match merged.entry(text.to_lowercase()) {
            Entry::Occupied(_) => stats.duplicate += 1,
            Entry::Vacant(slot) => {
                slot.insert(TagCandidate::new(text, raw.source).with_category(raw.category));
            }
        }
    }

    (merged.into_values().collect(), stats)
}
