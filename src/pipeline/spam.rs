use std::collections::HashSet;

use super::normalizer::is_accepted_char;

/// Longest tag (in characters) that is not considered spam.
pub const MAX_TAG_CHARS: usize = 80;

/// Word count above which a repeated word marks keyword stuffing.
pub const REPETITION_WORD_THRESHOLD: usize = 5;

/// Returns true if `tag` looks like spam and must be rejected.
///
/// A tag is spammy when any of these hold:
///
/// - it is empty or longer than [`MAX_TAG_CHARS`] characters
/// - it has more than [`REPETITION_WORD_THRESHOLD`] words and repeats a word
///   (case-insensitively), as in `"beat beat beat beat beat beat"`
/// - it contains a character outside the canonical tag character set
///
/// The check never mutates; it only gates.
///
/// # Examples
///
/// ```
/// use beattag::pipeline::is_spammy;
///
/// assert!(!is_spammy("drake type beat"));
/// assert!(is_spammy("trap trap trap trap trap trap beat"));
/// assert!(is_spammy("drake type beat!"));
/// assert!(is_spammy(""));
/// ```
pub fn is_spammy(tag: &str) -> bool {
    if tag.is_empty() || tag.chars().count() > MAX_TAG_CHARS {
        return true;
    }

    let words: Vec<String> = tag.split_whitespace().map(str::to_lowercase).collect();
    if words.len() > REPETITION_WORD_THRESHOLD {
        let distinct: HashSet<&String> = words.iter().collect();
        if distinct.len() != words.len() {
            return true;
        }
    }

    !tag.chars().all(is_accepted_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_overlong_tags_are_spam() {
        assert!(is_spammy(""));
        assert!(!is_spammy(&"a".repeat(80)));
        assert!(is_spammy(&"a".repeat(81)));
    }

    #[test]
    fn test_repetition_only_counts_above_five_words() {
        // Five words with a repeat is tolerated
        assert!(!is_spammy("beat beat beat beat beat"));
        assert!(!is_spammy("hard beat dark beat free"));
        // Six words with a repeat is stuffing
        assert!(is_spammy("beat beat beat beat beat beat"));
        assert!(is_spammy("hard beat dark beat free melodic"));
        // Six distinct words are fine
        assert!(!is_spammy("hard dark melodic free trap beat"));
    }

    #[test]
    fn test_repetition_is_case_insensitive() {
        assert!(is_spammy("Beat hard BEAT dark free melodic"));
    }

    #[test]
    fn test_disallowed_characters_are_spam() {
        assert!(is_spammy("drake type beat!"));
        assert!(is_spammy("drake\ttype beat"));
        assert!(is_spammy("beyoncé type beat"));
        assert!(is_spammy("drake, future"));
    }

    #[test]
    fn test_accepted_characters_pass() {
        assert!(!is_spammy("Drake Type Beat"));
        assert!(!is_spammy("r&b / soul type beat"));
        assert!(!is_spammy("lo-fi hip hop"));
        assert!(!is_spammy("drake's #typebeat +free"));
    }

    #[test]
    fn test_spam_scenario_from_keyword_stuffing() {
        assert!(is_spammy("trap trap trap trap trap trap beat"));
    }
}
