//! Candidate sourcing adapters.
//!
//! Each adapter turns a query into raw candidates and never fails: a broken
//! collaborator only means fewer candidates.

mod autocomplete;
mod generated;
mod template;

pub use autocomplete::LiveSuggestions;
pub use generated::{
    DEFAULT_FALLBACK_LIMIT, DEFAULT_GENERATED_LIMIT, ParsedCompletion, SYSTEM_PROMPT,
    build_user_prompt, fallback_candidates, generated_candidates, parse_completion,
};
pub use template::template_candidates;
