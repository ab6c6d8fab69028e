/// YouTube autocomplete HTTP client implementation.
///
/// The suggest endpoint is undocumented and answers with a JSONP payload of the
/// shape `callback(["query", [["suggestion", 0, [...]], ...], {...}])`.
use std::time::Duration;

use thiserror::Error;

/// Default suggest endpoint.
pub const DEFAULT_SUGGEST_URL: &str = "https://clients1.google.com/complete/search";

/// Total time budget for one suggestion fetch.
pub const SUGGEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when fetching autocomplete suggestions.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The fetch exceeded its timeout
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Response body did not have the expected shape
    #[error("Malformed suggestion payload: {0}")]
    MalformedPayload(String),

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl SuggestError {
    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Source of live autocomplete suggestions.
pub trait SuggestionProvider: Send + Sync {
    /// Fetches raw suggestion strings for `query` in language `lang`.
    fn fetch_suggestions(&self, query: &str, lang: &str) -> Result<Vec<String>, SuggestError>;
}

/// Builder for constructing `YouTubeSuggestClient` instances.
///
/// # Examples
///
/// ```
/// use beattag::suggest::YouTubeSuggestClientBuilder;
///
/// let client = YouTubeSuggestClientBuilder::new()
///     .endpoint("http://localhost:8080/complete/search")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.endpoint(), "http://localhost:8080/complete/search");
/// ```
#[derive(Debug, Default)]
pub struct YouTubeSuggestClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl YouTubeSuggestClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the suggest endpoint URL.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Overrides the 5 second fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// If `endpoint()` was not called, the `BEATTAG_SUGGEST_URL` environment
    /// variable is used, falling back to [`DEFAULT_SUGGEST_URL`].
    ///
    /// # Errors
    ///
    /// Returns `SuggestError::InvalidUrl` if the endpoint does not parse.
    pub fn build(self) -> Result<YouTubeSuggestClient, SuggestError> {
        let endpoint = if let Some(url) = self.endpoint {
            url
        } else {
            std::env::var("BEATTAG_SUGGEST_URL").unwrap_or_else(|_| DEFAULT_SUGGEST_URL.to_string())
        };

        reqwest::Url::parse(&endpoint)
            .map_err(|e| SuggestError::InvalidUrl(format!("{}: {}", endpoint, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(SUGGEST_TIMEOUT))
            .build()
            .map_err(SuggestError::Network)?;

        Ok(YouTubeSuggestClient { client, endpoint })
    }
}

/// Synchronous client for the YouTube autocomplete endpoint.
pub struct YouTubeSuggestClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl YouTubeSuggestClient {
    /// Returns the endpoint this client queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SuggestionProvider for YouTubeSuggestClient {
    fn fetch_suggestions(&self, query: &str, lang: &str) -> Result<Vec<String>, SuggestError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("client", "youtube"), ("ds", "yt"), ("q", query), ("hl", lang)])
            .send()
            .map_err(SuggestError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(SuggestError::from_reqwest)?;
        parse_suggest_payload(&body)
    }
}

/// Strips a JSONP wrapper, keeping the span from the first `[` to the last `]`.
///
/// Returns the input unchanged if no such span exists.
pub fn trim_jsonp(text: &str) -> &str {
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Parses the suggest payload into raw suggestion strings.
///
/// Rows that are not non-empty lists, or whose first element is not a
/// string, are skipped.
///
/// # Errors
///
/// Returns `SuggestError::MalformedPayload` if the body is not JSON or the
/// top level is not a list.
///
/// # Examples
///
/// ```
/// use beattag::suggest::parse_suggest_payload;
///
/// let body = r#"window.google.ac.h(["drake",[["drake type beat",0,[512]],["drake instrumental",0]],{"k":1}])"#;
/// let suggestions = parse_suggest_payload(body).unwrap();
/// assert_eq!(suggestions, vec!["drake type beat", "drake instrumental"]);
/// ```
pub fn parse_suggest_payload(text: &str) -> Result<Vec<String>, SuggestError> {
    let payload: serde_json::Value = serde_json::from_str(trim_jsonp(text))
        .map_err(|e| SuggestError::MalformedPayload(e.to_string()))?;

    let Some(top) = payload.as_array() else {
        return Err(SuggestError::MalformedPayload(
            "top-level value is not a list".to_string(),
        ));
    };

    let rows = top.get(1).and_then(|v| v.as_array());
    let suggestions = rows
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row.as_array()?.first()?.as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_jsonp_extracts_bracketed_span() {
        assert_eq!(trim_jsonp("cb([1,[2]])"), "[1,[2]]");
        assert_eq!(trim_jsonp("[]"), "[]");
        assert_eq!(trim_jsonp("no brackets"), "no brackets");
        assert_eq!(trim_jsonp("]["), "][");
    }

    #[test]
    fn parse_skips_rows_that_are_not_lists() {
        let body = r#"cb(["q",[["one",0],"bare string",[],[42],["two"]]])"#;
        assert_eq!(parse_suggest_payload(body).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn parse_returns_empty_when_rows_missing() {
        assert!(parse_suggest_payload(r#"["q"]"#).unwrap().is_empty());
        assert!(parse_suggest_payload(r#"["q", {"not": "rows"}]"#).unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_non_json_body() {
        let err = parse_suggest_payload("<html>blocked</html>").unwrap_err();
        assert!(matches!(err, SuggestError::MalformedPayload(_)));
    }

    #[test]
    fn parse_rejects_non_list_top_level() {
        let err = parse_suggest_payload(r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, SuggestError::MalformedPayload(_)));
    }

    #[test]
    fn build_returns_error_if_invalid_url_provided() {
        let result = YouTubeSuggestClientBuilder::new()
            .endpoint("definitely not a url")
            .build();
        assert!(matches!(result, Err(SuggestError::InvalidUrl(_))));
    }

    #[test]
    fn http_error_display_includes_status() {
        let error = SuggestError::Http { status: 429 };
        assert_eq!(error.to_string(), "HTTP error: status 429");
    }
}
