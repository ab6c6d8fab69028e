/// Generative text provider module.
///
/// This module provides the `GenerativeProvider` seam used by the generated-candidate
/// adapter and an Ollama-backed implementation of it.
mod client;

pub use client::{GenerativeProvider, LlmError, OllamaClient, OllamaClientBuilder};
