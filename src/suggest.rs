/// Live autocomplete suggestion module.
///
/// Provides the `SuggestionProvider` seam and a blocking client for the
/// YouTube suggest endpoint with a fixed per-call timeout.
mod client;

pub use client::{
    DEFAULT_SUGGEST_URL, SUGGEST_TIMEOUT, SuggestError, SuggestionProvider, YouTubeSuggestClient,
    YouTubeSuggestClientBuilder, parse_suggest_payload, trim_jsonp,
};
