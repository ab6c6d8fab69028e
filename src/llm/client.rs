/// Ollama HTTP client implementation.
///
/// This module provides `OllamaClient` for making synchronous HTTP requests to the Ollama API,
/// along with error types and builder patterns for configuration.
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when calling a generative text provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Provider-specific errors
    #[error("LLM API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl LlmError {
    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Generative text provider consumed by the generated-candidate adapter.
///
/// This trait enables substituting fake providers in tests and swapping
/// Ollama for any other text-generation backend.
pub trait GenerativeProvider: Send + Sync {
    /// Generates text for a system prompt and a user prompt.
    ///
    /// # Returns
    ///
    /// Returns the raw generated text, or an error if the request fails.
    fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

/// Builder for constructing `OllamaClient` instances.
///
/// # Examples
///
/// ```
/// use beattag::llm::OllamaClientBuilder;
///
/// let client = OllamaClientBuilder::new()
///     .base_url("http://localhost:11434")
///     .model("llama3.1:8b")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "llama3.1:8b");
/// ```
#[derive(Debug, Default)]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl OllamaClientBuilder {
    /// Creates a new `OllamaClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for the Ollama API (e.g., "http://localhost:11434").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name for Ollama API calls.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the total request timeout (default 60 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `OllamaClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, this method will check the `OLLAMA_HOST`
    /// environment variable. If not set, it defaults to `http://localhost:11434`.
    ///
    /// If `model()` was not called, this method will check the `OLLAMA_MODEL`
    /// environment variable. If not set, it defaults to an empty string.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidUrl` if the base URL does not parse.
    pub fn build(self) -> Result<OllamaClient, LlmError> {
        // Determine base URL: use builder value, then env var, then default
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost:11434".to_string())
        };

        // Determine model: use builder value, then env var, then default
        let model = if let Some(m) = self.model {
            m
        } else {
            std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| String::new())
        };

        reqwest::Url::parse(&base_url)
            .map_err(|e| LlmError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(60)))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(LlmError::Network)?;

        Ok(OllamaClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

/// Synchronous HTTP client for the Ollama `/api/generate` endpoint.
///
/// Each call is a single attempt; callers decide how to degrade on failure.
/// It should be constructed using `OllamaClientBuilder`.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Builds the JSON body for a non-streaming generate request.
fn request_body(model: &str, system_prompt: &str, user_prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "system": system_prompt,
        "prompt": user_prompt,
        "stream": false
    })
}

/// Extracts the `response` field from an Ollama generate reply.
fn extract_response(json: &serde_json::Value) -> Result<String, LlmError> {
    if let Some(message) = json.get("error").and_then(|v| v.as_str()) {
        return Err(LlmError::Api {
            message: message.to_string(),
        });
    }

    json.get("response")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| LlmError::Api {
            message: "Missing 'response' field in API response".to_string(),
        })
}

impl GenerativeProvider for OllamaClient {
    fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = request_body(&self.model, system_prompt, user_prompt);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(LlmError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Http {
                status: status.as_u16(),
            });
        }

        let text = response.text().map_err(LlmError::from_reqwest)?;
        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(LlmError::Serialization)?;

        extract_response(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::error::Error;

    #[test]
    fn network_error_variant_creation_and_display() {
        let client = reqwest::blocking::Client::new();
        let reqwest_error = client.get("not-a-valid-url").build().unwrap_err();
        let error = LlmError::Network(reqwest_error);

        assert!(format!("{}", error).contains("Network error"));
    }

    #[test]
    fn timeout_error_variant_creation_and_display() {
        let client = reqwest::blocking::Client::new();
        let reqwest_error = client.get("http://").build().unwrap_err();
        let error = LlmError::Timeout(reqwest_error);

        assert_eq!(format!("{}", error), "Request timed out");
    }

    #[test]
    fn http_error_variant_with_status_code() {
        let error = LlmError::Http { status: 404 };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("HTTP error"));
        assert!(error_msg.contains("404"));
    }

    #[test]
    fn serialization_error_variant_wraps_serde_errors() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = LlmError::Serialization(json_error);

        assert!(format!("{}", error).contains("Serialization error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn request_body_carries_system_and_user_prompts() {
        let body = request_body("llama3.1:8b", "be an seo expert", "tags for drake");

        assert_eq!(body["model"], "llama3.1:8b");
        assert_eq!(body["system"], "be an seo expert");
        assert_eq!(body["prompt"], "tags for drake");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn extract_response_reads_response_field() {
        let json = serde_json::json!({ "response": "{\"candidates\": []}", "done": true });
        assert_eq!(extract_response(&json).unwrap(), "{\"candidates\": []}");
    }

    #[test]
    fn extract_response_surfaces_api_error_message() {
        let json = serde_json::json!({ "error": "model 'nope' not found" });
        let err = extract_response(&json).unwrap_err();

        assert!(matches!(err, LlmError::Api { ref message } if message.contains("not found")));
    }

    #[test]
    fn extract_response_fails_without_response_field() {
        let json = serde_json::json!({ "done": true });
        assert!(matches!(extract_response(&json), Err(LlmError::Api { .. })));
    }

    #[test]
    fn build_returns_error_if_invalid_url_provided() {
        let result = OllamaClientBuilder::new()
            .base_url("not-a-valid-url")
            .build();

        assert!(matches!(result, Err(LlmError::InvalidUrl(_))));
    }

    #[test]
    fn build_strips_trailing_slash_from_base_url() {
        let client = OllamaClientBuilder::new()
            .base_url("http://localhost:11434/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    #[serial]
    fn build_uses_default_url_when_base_url_not_called() {
        unsafe {
            std::env::remove_var("OLLAMA_HOST");
        }

        let client = OllamaClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    #[serial]
    fn build_reads_ollama_host_environment_variable_if_set() {
        unsafe {
            std::env::set_var("OLLAMA_HOST", "http://custom-host:11434");
        }

        let client = OllamaClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url(), "http://custom-host:11434");

        unsafe {
            std::env::remove_var("OLLAMA_HOST");
        }
    }

    #[test]
    #[serial]
    fn environment_variable_override_precedence() {
        unsafe {
            std::env::set_var("OLLAMA_HOST", "http://env-var-host:11434");
            std::env::set_var("OLLAMA_MODEL", "env-model");
        }

        let client = OllamaClientBuilder::new()
            .base_url("http://builder-host:11434")
            .model("builder-model")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://builder-host:11434");
        assert_eq!(client.model(), "builder-model");

        unsafe {
            std::env::remove_var("OLLAMA_HOST");
            std::env::remove_var("OLLAMA_MODEL");
        }
    }

    #[test]
    #[serial]
    fn build_reads_ollama_model_environment_variable_if_set() {
        unsafe {
            std::env::set_var("OLLAMA_MODEL", "gemma3:4b");
        }

        let client = OllamaClientBuilder::new().build().unwrap();
        assert_eq!(client.model(), "gemma3:4b");

        unsafe {
            std::env::remove_var("OLLAMA_MODEL");
        }
    }

    #[test]
    fn trait_can_be_implemented_by_mock_struct() {
        struct MockClient {
            response: String,
        }

        impl GenerativeProvider for MockClient {
            fn generate(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
                Ok(self.response.clone())
            }
        }

        let mock = MockClient {
            response: "test response".to_string(),
        };
        let provider: &dyn GenerativeProvider = &mock;
        assert_eq!(provider.generate("system", "prompt").unwrap(), "test response");
    }
}
