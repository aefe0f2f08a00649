//! LLM provider trait and request/response types.
//!
//! Defines the interface that all LLM providers implement, plus the
//! factory that creates the right provider from CLI flags and config.

use crate::config::LlmConfig;
use crate::error::{ConfigError, PipelineError, PipelineResult};
use async_trait::async_trait;
use base64::Engine;
use std::path::Path;
use std::time::Duration;

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and a file extension.
    ///
    /// The bytes are forwarded untouched: no decoding, resizing or format check.
    pub fn from_bytes(bytes: &[u8], extension: &str) -> Self {
        let media_type = match extension.to_lowercase().as_str() {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "webp" => "image/webp",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Read an image file and encode it.
    pub async fn from_path(path: &Path) -> PipelineResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PipelineError::FileNotFound(path.to_path_buf())
            } else {
                PipelineError::Read {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Ok(Self::from_bytes(&bytes, extension))
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// One image plus the instructions sent with it.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The image to send
    pub image: ImageInput,
    /// System instruction
    pub system: String,
    /// User text prompt
    pub prompt: String,
    /// Maximum tokens to generate; `None` leaves the reply unbounded
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn new(image: ImageInput, system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            image,
            system: system.into(),
            prompt: prompt.into(),
            max_tokens: None,
        }
    }

    /// Bound the generated length.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// The response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Send one request. Transport errors, non-2xx statuses and empty replies
    /// all come back as `PipelineError::Llm`.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError>;

    /// Per-request transport timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Reject a reply that is missing or only whitespace. The text is returned
/// untouched so it can be persisted exactly as the service sent it.
pub(crate) fn non_blank(text: Option<String>, provider: &str) -> PipelineResult<String> {
    text.filter(|t| !t.trim().is_empty())
        .ok_or_else(|| PipelineError::Llm {
            message: format!("{provider} returned no content"),
            status_code: None,
        })
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider based on provider name, config, and optional model override.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("openai", "anthropic", "ollama")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    /// * `timeout` - Transport timeout applied to every request
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, ConfigError> {
        match provider {
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::MissingApiKey {
                        provider: "openai".to_string(),
                        env: "OPENAI_API_KEY".to_string(),
                    }
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &cfg.endpoint,
                    &api_key,
                    &model,
                    timeout,
                )))
            }
            "anthropic" => {
                let cfg = config.anthropic.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::MissingApiKey {
                        provider: "anthropic".to_string(),
                        env: "ANTHROPIC_API_KEY".to_string(),
                    }
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::anthropic::AnthropicProvider::new(
                    &api_key, &model, timeout,
                )))
            }
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    &model,
                    timeout,
                )))
            }
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAiConfig;

    #[test]
    fn test_image_input_from_bytes_jpeg() {
        let input = ImageInput::from_bytes(&[0xFF, 0xD8, 0xFF], "JPG");
        assert_eq!(input.media_type, "image/jpeg");
        assert_eq!(input.data, "/9j/");
    }

    #[test]
    fn test_image_input_from_bytes_bmp_and_gif() {
        assert_eq!(ImageInput::from_bytes(b"BM", "bmp").media_type, "image/bmp");
        assert_eq!(ImageInput::from_bytes(b"GIF89a", "gif").media_type, "image/gif");
    }

    #[test]
    fn test_image_input_data_url() {
        let input = ImageInput::from_bytes(&[1, 2, 3], "png");
        let url = input.data_url();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_image_input_from_path_forwards_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-really-an-image.png");
        std::fs::write(&path, b"hello").unwrap();

        let input = ImageInput::from_path(&path).await.unwrap();
        assert_eq!(input.data, "aGVsbG8=");
        assert_eq!(input.media_type, "image/png");
    }

    #[tokio::test]
    async fn test_image_input_from_missing_path() {
        let err = ImageInput::from_path(Path::new("/nope/missing.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_request_max_tokens_defaults_to_unbounded() {
        let image = ImageInput::from_bytes(&[1], "jpeg");
        let request = LlmRequest::new(image.clone(), "sys", "Tag this image");
        assert_eq!(request.max_tokens, None);

        let request = LlmRequest::new(image, "sys", "Describe").with_max_tokens(Some(300));
        assert_eq!(request.max_tokens, Some(300));
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_non_blank_keeps_reply_verbatim() {
        let text = non_blank(Some("  A sandal.\n".to_string()), "OpenAI").unwrap();
        assert_eq!(text, "  A sandal.\n");
    }

    #[test]
    fn test_non_blank_rejects_whitespace_and_missing() {
        let err = non_blank(Some(" \n\t".to_string()), "Ollama").unwrap_err();
        assert!(matches!(err, PipelineError::Llm { status_code: None, .. }));
        assert!(err.to_string().contains("Ollama returned no content"));
        assert!(non_blank(None, "Anthropic").is_err());
    }

    #[test]
    fn test_factory_uses_literal_key_and_model_override() {
        let config = LlmConfig {
            openai: Some(OpenAiConfig {
                api_key: "sk-test".to_string(),
                ..OpenAiConfig::default()
            }),
            ..LlmConfig::default()
        };
        let provider =
            LlmProviderFactory::create("openai", &config, Some("gpt-4o"), Duration::from_secs(5))
                .unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_factory_missing_key_is_config_error() {
        let config = LlmConfig {
            openai: Some(OpenAiConfig {
                api_key: "${DEFINITELY_NOT_SET_XYZ_456}".to_string(),
                ..OpenAiConfig::default()
            }),
            ..LlmConfig::default()
        };
        let err = LlmProviderFactory::create("openai", &config, None, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
    }

    #[test]
    fn test_factory_ollama_needs_no_key() {
        let provider = LlmProviderFactory::create(
            "ollama",
            &LlmConfig::default(),
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_factory_unknown_provider() {
        let err =
            LlmProviderFactory::create("gemini", &LlmConfig::default(), None, Duration::from_secs(5))
                .err()
                .unwrap();
        assert!(matches!(err, ConfigError::UnknownProvider(name) if name == "gemini"));
    }
}
