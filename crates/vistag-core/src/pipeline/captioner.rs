//! Caption pipeline: one free-text description file per image.

use crate::config::Config;
use crate::error::{ConfigError, PipelineResult};
use crate::llm::{ImageInput, LlmProvider, LlmRequest};
use crate::output;
use crate::types::{BatchReport, CaptionOutcome};
use std::path::{Path, PathBuf};

use super::DiscoveredFile;

/// Everything the captioner needs besides the provider.
#[derive(Debug, Clone)]
pub struct CaptionOptions {
    /// System instruction sent with every image
    pub system: String,
    /// User prompt sent with every image
    pub prompt: String,
    /// Upper bound on generated length
    pub max_tokens: Option<u32>,
    /// Directory receiving `<stem>.txt` files
    pub output_dir: PathBuf,
}

impl CaptionOptions {
    /// Resolve options from config. Fails if the system-message file is missing.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            system: config.caption_system_message()?,
            prompt: config.prompts.caption_prompt.clone(),
            max_tokens: config.processing.caption_max_tokens,
            output_dir: config.captions_dir(),
        })
    }
}

/// Captions images one at a time through a vision LLM.
pub struct Captioner {
    provider: Box<dyn LlmProvider>,
    options: CaptionOptions,
}

impl Captioner {
    pub fn new(provider: Box<dyn LlmProvider>, options: CaptionOptions) -> Self {
        Self { provider, options }
    }

    /// Caption one image and write the text next to its siblings.
    pub async fn caption_image(&self, path: &Path) -> PipelineResult<CaptionOutcome> {
        let image = ImageInput::from_path(path).await?;
        let request = LlmRequest::new(image, &self.options.system, &self.options.prompt)
            .with_max_tokens(self.options.max_tokens);

        let response = self.provider.generate(&request).await?;
        tracing::debug!(
            "{} replied in {}ms ({:?} tokens)",
            response.model,
            response.latency_ms,
            response.tokens_used
        );

        let output = output::output_path(&self.options.output_dir, path, "txt");
        output::write_text(&output, &response.text)?;

        Ok(CaptionOutcome {
            image: path.to_path_buf(),
            output,
            text: response.text,
        })
    }

    /// Caption every file in order. A failed image is logged and skipped.
    ///
    /// `on_item` is called after each image with whether it succeeded.
    pub async fn run<F>(&self, files: &[DiscoveredFile], mut on_item: F) -> BatchReport
    where
        F: FnMut(&DiscoveredFile, bool),
    {
        let mut report = BatchReport::default();

        for file in files {
            let name = file.name();
            tracing::info!("Processing image: {name}");

            match self.caption_image(&file.path).await {
                Ok(outcome) => {
                    tracing::info!("Caption: {}", outcome.text);
                    tracing::info!("Response saved to: {}", outcome.output.display());
                    report.succeeded += 1;
                    on_item(file, true);
                }
                Err(e) => {
                    tracing::error!("Failed to process image {name}: {e}");
                    report.failed.push((file.path.clone(), e.to_string()));
                    on_item(file, false);
                }
            }
        }

        report
    }
}
