use crate::models::{CandidateSource, RawCandidate};
use crate::pipeline::TagNormalizer;

/// Builds the fixed set of template variants for a query.
///
/// Pure and offline: the query is normalized, then prefixed or suffixed with
/// high-intent modifier words. `year` is used for the dated variant. An
/// empty normalized query yields no variants.
///
/// # Examples
///
/// ```
/// use beattag::sources::template_candidates;
///
/// let variants = template_candidates("lil uzi vert", "2025");
/// assert_eq!(variants.len(), 12);
/// assert_eq!(variants[0].text, "lil uzi vert type beat");
/// assert_eq!(variants[6].text, "lil uzi vert type beat 2025");
/// ```
pub fn template_candidates(query: &str, year: &str) -> Vec<RawCandidate> {
    let q = TagNormalizer::normalize(query);
    if q.is_empty() {
        return Vec::new();
    }

    let variants = [
        format!("{q} type beat"),
        format!("{q} instrumental"),
        format!("hard {q} type beat"),
        format!("dark {q} type beat"),
        format!("melodic {q} instrumental"),
        format!("free {q} type beat"),
        format!("{q} type beat {year}"),
        format!("{q} beat"),
        format!("{q} sample"),
        format!("{q} freestyle beat"),
        format!("{q} type beat with hook"),
        format!("{q} free for profit"),
    ];

    variants
        .iter()
        .map(|v| TagNormalizer::normalize(v))
        .filter(|v| !v.is_empty())
        .map(|v| RawCandidate::new(v, CandidateSource::Template))
        .collect()
}
