//! Generated-candidate adapter.
//!
//! Asks a `GenerativeProvider` for structured tag candidates and tolerates
//! replies that are not valid JSON by falling back to a comma/newline split.

use serde::Deserialize;

use crate::llm::GenerativeProvider;
use crate::models::{CandidateSource, RawCandidate};
use crate::pipeline::TagNormalizer;

/// Maximum candidates kept from the comma/newline fallback.
pub const DEFAULT_FALLBACK_LIMIT: usize = 100;

/// Number of candidates requested from the model by default.
pub const DEFAULT_GENERATED_LIMIT: usize = 120;

/// System prompt establishing the persona and output discipline.
pub const SYSTEM_PROMPT: &str = r#"You are a YouTube SEO expert specializing in music beat discovery optimization.
Return rigorous, realistic tags (no spam). Think about misspellings, artist variants,
genre+mood+tempo, and real searcher language. Output strict JSON only."#;

const USER_PROMPT_TEMPLATE: &str = r#"Task: Propose up to {limit} realistic YouTube tag candidates for: "{query}".

Rules:
- Tags must sound like what people actually type.
- Include a balanced mix:
  * most_searched (<= 40%)
  * ctr_drivers (<= 30%)
  * long_tail (<= 25%)
  * algo_favorites (<= 15%)
- Keep short tags common; allow longer tags only in long_tail.
- Include some artist misspellings/variants if relevant.
- Allow only ASCII letters, numbers, spaces, hyphen, apostrophe, slash, ampersand, plus.
- No duplicates. No explanations.

Return STRICT JSON in this schema:
{
  "candidates": [
    {"text": "drake type beat", "category": "most_searched"},
    {"text": "hard trap instrumental 2025", "category": "ctr_drivers"}
  ]
}"#;

/// Builds the user prompt for `query`, requesting up to `limit` candidates.
pub fn build_user_prompt(query: &str, limit: usize) -> String {
    USER_PROMPT_TEMPLATE
        .replace("{limit}", &limit.to_string())
        .replace("{query}", query)
}

/// Outcome of parsing a model completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCompletion {
    /// The completion contained the expected JSON envelope.
    Parsed(Vec<RawCandidate>),
    /// Structured parsing failed; carries the raw completion text.
    ParseFailed(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    candidates: Vec<EnvelopeItem>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeItem {
    #[serde(default)]
    text: serde_json::Value,
    #[serde(default)]
    category: serde_json::Value,
}

impl EnvelopeItem {
    fn into_candidate(self) -> RawCandidate {
        let text = match self.text {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };

        let category = match self.category {
            serde_json::Value::String(category) if !category.is_empty() => Some(category),
            _ => None,
        };

        RawCandidate::new(text, CandidateSource::Generated).with_category(category)
    }
}

/// Extracts the outermost `{ ... }` span from a completion.
///
/// Models often wrap JSON in markdown fences or chatter.
fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;

    if start <= end {
        Some(&trimmed[start..=end])
    } else {
        None
    }
}

/// Parses a completion into generated candidates.
///
/// Items without `text` produce empty candidates, which merge drops later.
///
/// # Examples
///
/// ```
/// use beattag::sources::{ParsedCompletion, parse_completion};
///
/// let reply = "```json\n{\"candidates\":[{\"text\":\"drake type beat\",\"category\":\"most_searched\"}]}\n```";
/// let ParsedCompletion::Parsed(candidates) = parse_completion(reply) else {
///     panic!("expected structured parse");
/// };
/// assert_eq!(candidates[0].text, "drake type beat");
/// assert_eq!(candidates[0].category.as_deref(), Some("most_searched"));
/// ```
pub fn parse_completion(text: &str) -> ParsedCompletion {
    let json = extract_json(text).unwrap_or_else(|| text.trim());

    match serde_json::from_str::<Envelope>(json) {
        Ok(envelope) => ParsedCompletion::Parsed(
            envelope
                .candidates
                .into_iter()
                .map(EnvelopeItem::into_candidate)
                .collect(),
        ),
        Err(_) => ParsedCompletion::ParseFailed(text.to_string()),
    }
}

/// Best-effort candidates from an unstructured completion.
///
/// Splits on commas and newlines, drops entries that normalize to nothing and
/// keeps at most `limit`.
pub fn fallback_candidates(text: &str, limit: usize) -> Vec<RawCandidate> {
    text.split([',', '\n'])
        .map(TagNormalizer::normalize)
        .filter(|t| !t.is_empty())
        .take(limit)
        .map(|t| RawCandidate::new(t, CandidateSource::Generated))
        .collect()
}

/// Requests candidates for `query` from the provider.
///
/// Never fails: a provider error or an empty reply yields an empty list, and
/// an unparsable reply goes through [`fallback_candidates`].
pub fn generated_candidates(
    provider: Option<&dyn GenerativeProvider>,
    query: &str,
    limit: usize,
    fallback_limit: usize,
) -> Vec<RawCandidate> {
    let Some(provider) = provider else {
        return Vec::new();
    };

    let prompt = build_user_prompt(query, limit);
    let text = match provider.generate(SYSTEM_PROMPT, &prompt) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, query, "generative provider failed, continuing without generated candidates");
            return Vec::new();
        }
    };

    if text.trim().is_empty() {
        tracing::warn!(query, "generative provider returned no text");
        return Vec::new();
    }

    match parse_completion(&text) {
        ParsedCompletion::Parsed(candidates) => candidates,
        ParsedCompletion::ParseFailed(raw) => {
            let candidates = fallback_candidates(&raw, fallback_limit);
            tracing::warn!(
                query,
                recovered = candidates.len(),
                "completion was not valid JSON, using comma/newline fallback"
            );
            candidates
        }
    }
}
