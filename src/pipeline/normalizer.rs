/// Post-processing layer for candidate text.
///
/// Brings every candidate into canonical tag form regardless of which
/// source produced it: HTML entities decoded, whitespace collapsed and
/// only characters the tag field accepts kept.
pub struct TagNormalizer;

/// Punctuation allowed in a canonical tag besides ASCII letters, digits and space.
pub const ALLOWED_PUNCTUATION: [char; 6] = ['-', '\'', '&', '/', '+', '#'];

/// Returns true if `c` may appear in a canonical tag.
pub fn is_accepted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || ALLOWED_PUNCTUATION.contains(&c)
}

impl TagNormalizer {
    /// Normalizes raw candidate text to canonical tag form.
    ///
    /// # Normalization rules
    ///
    /// - Decodes HTML entities (`&amp;` becomes `&`)
    /// - Collapses whitespace runs to single spaces and trims
    /// - Removes every character outside ASCII letters, digits, space and `-'&/+#`
    /// - Collapses spaces again, since removal can leave runs behind
    ///
    /// The rules are applied until the text stops changing, so the result is
    /// always a fixed point. An empty result means "discard this candidate".
    ///
    /// # Examples
    ///
    /// ```
    /// use beattag::pipeline::TagNormalizer;
    ///
    /// assert_eq!(TagNormalizer::normalize("  Drake   Type Beat "), "Drake Type Beat");
    /// assert_eq!(TagNormalizer::normalize("Future &amp; Metro"), "Future & Metro");
    /// assert_eq!(TagNormalizer::normalize("🔥 hard beat 🔥"), "hard beat");
    /// assert_eq!(TagNormalizer::normalize("!!!"), "");
    /// ```
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        let mut current = Self::normalize_once(raw);
        loop {
            let next = Self::normalize_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn normalize_once(raw: &str) -> String {
        let decoded = html_escape::decode_html_entities(raw);
        let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

        let stripped = collapsed
            .chars()
            .filter(|c| is_accepted_char(*c))
            .collect::<String>();

        stripped
            .split(' ')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
