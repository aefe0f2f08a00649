//! Sub-configuration structs with defaults matching the original batch layout.

use serde::{Deserialize, Serialize};

/// Input and output locations. Relative paths resolve against the working
/// directory; `~` is expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for images
    pub images_dir: String,

    /// Directory for per-image caption text files
    pub captions_dir: String,

    /// Directory for per-image tag documents and the aggregate
    pub tags_dir: String,

    /// File name of the corpus-level aggregate inside `tags_dir`
    pub aggregate_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            images_dir: "images".to_string(),
            captions_dir: "captions".to_string(),
            tags_dir: "tags".to_string(),
            aggregate_file: "aggregated_tags.json".to_string(),
        }
    }
}

/// System instructions (read from files) and the fixed user prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// System instruction file for the captioner
    pub caption_system_file: String,

    /// System instruction file for the tagger
    pub tag_system_file: String,

    /// User prompt sent with every image by the captioner
    pub caption_prompt: String,

    /// User prompt sent with every image by the tagger
    pub tag_prompt: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            caption_system_file: "ic_system_message.txt".to_string(),
            tag_system_file: "it_system_message.txt".to_string(),
            caption_prompt: "This is an image from Birkenstock's Pinterest page. \
                             Describe what you see in this image"
                .to_string(),
            tag_prompt: "This is an image from Birkenstock's Pinterest page. Tag this image"
                .to_string(),
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Accepted file extensions (matched case-insensitively)
    pub supported_formats: Vec<String>,

    /// Upper bound on generated caption length
    pub caption_max_tokens: Option<u32>,

    /// Upper bound on generated tag documents. Unset by default so the model
    /// can always finish the JSON.
    pub tag_max_tokens: Option<u32>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "gif".to_string(),
                "bmp".to_string(),
            ],
            caption_max_tokens: Some(300),
            tag_max_tokens: None,
        }
    }
}

/// Transport limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// HTTP timeout for one inference call in milliseconds. Expiry fails the
    /// image; it is never retried.
    pub llm_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            llm_timeout_ms: 120_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// LLM provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider used when the CLI doesn't name one
    pub provider: String,

    /// OpenAI (or OpenAI-compatible) configuration
    pub openai: Option<OpenAiConfig>,

    /// Anthropic configuration
    pub anthropic: Option<AnthropicConfig>,

    /// Ollama (local) configuration
    pub ollama: Option<OllamaConfig>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            openai: None,
            anthropic: None,
            ollama: None,
        }
    }
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Chat Completions endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4.1".to_string(),
        }
    }
}

/// Anthropic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: "${ANTHROPIC_API_KEY}".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
        }
    }
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama API endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2-vision".to_string(),
        }
    }
}
