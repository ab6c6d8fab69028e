//! Token-overlap similarity shared by the scorer and the diversity selector.

use std::collections::HashSet;

/// Splits text into lowercase ASCII alphanumeric tokens.
///
/// # Examples
///
/// ```
/// use beattag::pipeline::tokenize;
///
/// assert_eq!(tokenize("Lil Uzi-Vert type beat 2025!"), vec!["lil", "uzi", "vert", "type", "beat", "2025"]);
/// assert!(tokenize("--- !!").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Token set of `text`, as used for Jaccard comparisons.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Calculates Jaccard similarity between two token sets.
///
/// Returns `|a ∩ b| / |a ∪ b|`, or `0.0` when either set is empty.
///
/// # Examples
///
/// ```
/// use beattag::pipeline::{jaccard, token_set};
///
/// let a = token_set("drake type beat");
/// let b = token_set("drake instrumental");
/// // Intersection: {"drake"} = 1, Union: 4
/// assert_eq!(jaccard(&a, &b), 0.25);
/// assert_eq!(jaccard(&a, &token_set("")), 0.0);
/// ```
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.union(b).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_splits_on_punctuation_and_case() {
        assert_eq!(tokenize("R&B/Soul"), vec!["r", "b", "soul"]);
        assert_eq!(tokenize("drake's"), vec!["drake", "s"]);
        assert_eq!(tokenize("  "), Vec::<String>::new());
    }

    #[test]
    fn test_token_set_deduplicates() {
        assert_eq!(token_set("beat Beat BEAT"), set(&["beat"]));
    }

    #[test]
    fn test_jaccard_identical() {
        let s = set(&["drake", "beat"]);
        assert_eq!(jaccard(&s, &s), 1.0);
    }

    #[test]
    fn test_jaccard_no_overlap() {
        assert_eq!(jaccard(&set(&["drake"]), &set(&["future"])), 0.0);
    }

    #[test]
    fn test_jaccard_partial() {
        let a = set(&["drake", "type", "beat"]);
        let b = set(&["drake", "type", "instrumental"]);
        // Intersection: 2, Union: 4
        assert_eq!(jaccard(&a, &b), 0.5);
    }

    #[test]
    fn test_jaccard_empty_sets_are_dissimilar() {
        let empty = HashSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&empty, &set(&["beat"])), 0.0);
    }
}
