//! Vision LLM integration.
//!
//! Provides a provider abstraction over the supported completion backends
//! (OpenAI-compatible, Anthropic, Ollama). Each call sends one image with a
//! system instruction and a user prompt and returns the raw reply text.

pub(crate) mod anthropic;
#[cfg(test)]
pub(crate) mod mock;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;

pub use provider::{ImageInput, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse};
