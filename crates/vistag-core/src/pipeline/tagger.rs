//! Tag pipeline: one JSON tag document per image, folded into a corpus
//! aggregate that is ranked and written once at the end of the batch.

use crate::config::Config;
use crate::error::{ConfigError, PipelineResult};
use crate::llm::{ImageInput, LlmProvider, LlmRequest};
use crate::output;
use crate::tagging::{TagAggregate, TagDocument, TagSummary};
use crate::types::BatchReport;
use std::path::{Path, PathBuf};

use super::DiscoveredFile;

/// Everything the tagger needs besides the provider.
#[derive(Debug, Clone)]
pub struct TagOptions {
    /// System instruction sent with every image
    pub system: String,
    /// User prompt sent with every image
    pub prompt: String,
    /// Upper bound on generated length (normally unbounded)
    pub max_tokens: Option<u32>,
    /// Directory receiving `<stem>.json` documents
    pub output_dir: PathBuf,
    /// Where the final aggregate is written
    pub aggregate_path: PathBuf,
}

impl TagOptions {
    /// Resolve options from config. Fails if the system-message file is missing.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            system: config.tag_system_message()?,
            prompt: config.prompts.tag_prompt.clone(),
            max_tokens: config.processing.tag_max_tokens,
            output_dir: config.tags_dir(),
            aggregate_path: config.aggregate_path(),
        })
    }
}

/// Outcome of a tagging batch.
#[derive(Debug, Clone)]
pub struct TagRun {
    /// Per-image counts
    pub report: BatchReport,
    /// Final ranked aggregate
    pub summary: TagSummary,
    /// Aggregate file, if one was written
    pub aggregate_file: Option<PathBuf>,
}

/// Tags images one at a time through a vision LLM.
pub struct Tagger {
    provider: Box<dyn LlmProvider>,
    options: TagOptions,
}

impl Tagger {
    pub fn new(provider: Box<dyn LlmProvider>, options: TagOptions) -> Self {
        Self { provider, options }
    }

    /// Tag one image: call the model, parse its reply, save the document.
    ///
    /// Returns the parsed document and the file it was written to.
    pub async fn tag_image(&self, path: &Path) -> PipelineResult<(TagDocument, PathBuf)> {
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

        let document = TagDocument::parse(path, &response.text)?;
        let output = output::output_path(&self.options.output_dir, path, "json");
        output::write_json(&output, document.raw())?;

        Ok((document, output))
    }

    /// Tag every file in order and aggregate the results.
    ///
    /// An image contributes to the aggregate only once its document parsed
    /// and was saved; any failure is logged and the image skipped. The
    /// aggregate file is written when at least one category has tags.
    pub async fn run<F>(&self, files: &[DiscoveredFile], mut on_item: F) -> TagRun
    where
        F: FnMut(&DiscoveredFile, bool),
    {
        let mut report = BatchReport::default();
        let mut aggregate = TagAggregate::new();

        for file in files {
            let name = file.name();
            tracing::info!("Processing image: {name}");

            match self.tag_image(&file.path).await {
                Ok((document, output)) => {
                    tracing::info!(
                        "JSON response saved to: {} ({} tags)",
                        output.display(),
                        document.len()
                    );
                    aggregate.merge(&document);
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

        let summary = aggregate.finalize();
        let aggregate_file = self.write_summary(&summary);

        TagRun {
            report,
            summary,
            aggregate_file,
        }
    }

    fn write_summary(&self, summary: &TagSummary) -> Option<PathBuf> {
        if summary.is_empty() {
            tracing::warn!("No tags collected; aggregate not written");
            return None;
        }
        let path = &self.options.aggregate_path;
        match output::write_json(path, summary) {
            Ok(()) => {
                tracing::info!("Aggregated tags saved to: {}", path.display());
                Some(path.clone())
            }
            Err(e) => {
                tracing::error!("Failed to save aggregated tags: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;
    use crate::error::PipelineError;
    use crate::llm::mock::MockProvider;
    use crate::pipeline::FileDiscovery;
    use crate::tagging::Category;
    use crate::types::TagEntry;
    use tracing_test::traced_test;

    fn options(root: &Path) -> TagOptions {
        let tags = root.join("tags");
        TagOptions {
            system: "Return JSON tags.".to_string(),
            prompt: "Tag this image".to_string(),
            max_tokens: None,
            aggregate_path: tags.join("aggregated_tags.json"),
            output_dir: tags,
        }
    }

    fn write_images(root: &Path, images: &[(&str, &str)]) -> Vec<DiscoveredFile> {
        let dir = root.join("images");
        std::fs::create_dir_all(&dir).unwrap();
        for (name, content) in images {
            std::fs::write(dir.join(name), content).unwrap();
        }
        FileDiscovery::new(&ProcessingConfig::default()).discover(&dir)
    }

    #[tokio::test]
    async fn test_tag_image_saves_raw_document() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &[("pin.png", "pin")]);
        let reply = r#"{"mood":[{"tag":"calm","weight":8}],"notes":"extra"}"#;
        let provider = MockProvider::new().reply(b"pin", reply);
        let seen = provider.seen_handle();
        let tagger = Tagger::new(Box::new(provider), options(dir.path()));

        let (document, output) = tagger.tag_image(&files[0].path).await.unwrap();
        assert_eq!(output, dir.path().join("tags").join("pin.json"));
        assert_eq!(document.entries(Category::Mood), &[TagEntry::new("calm", 8.0)]);

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(saved["notes"], "extra");

        assert_eq!(seen.lock().unwrap()[0].max_tokens, None);
    }

    #[tokio::test]
    async fn test_tag_image_malformed_json_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &[("pin.jpg", "pin")]);
        let provider = MockProvider::new().reply(b"pin", "{\"mood\": [");
        let tagger = Tagger::new(Box::new(provider), options(dir.path()));

        let err = tagger.tag_image(&files[0].path).await.unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
        assert!(!dir.path().join("tags").join("pin.json").exists());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_run_end_to_end_skips_failed_images() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(
            dir.path(),
            &[("1.jpg", "first"), ("2.jpg", "second"), ("3.jpg", "third")],
        );
        let provider = MockProvider::new()
            .fail(b"first", None, "OpenAI request failed: connection refused")
            .reply(b"second", "mood: calm, weight 8")
            .reply(b"third", r#"{"mood":[{"tag":"calm","weight":8}]}"#);
        let tagger = Tagger::new(Box::new(provider), options(dir.path()));

        let run = tagger.run(&files, |_, _| {}).await;

        assert_eq!(run.report.succeeded, 1);
        assert_eq!(run.report.failed.len(), 2);
        assert_eq!(run.summary.iter().count(), 1);
        assert_eq!(
            run.summary.get(Category::Mood).unwrap(),
            &[TagEntry::new("calm", 8.0)]
        );

        let aggregate_file = run.aggregate_file.unwrap();
        let content = std::fs::read_to_string(aggregate_file).unwrap();
        assert!(content.contains("\"weight\": 8\n"));
        let saved: TagSummary = serde_json::from_str(&content).unwrap();
        assert_eq!(saved, run.summary);

        logs_assert(|lines: &[&str]| {
            let errors = lines
                .iter()
                .filter(|line| line.contains("ERROR") && line.contains("Failed to process image"))
                .count();
            if errors == 2 {
                Ok(())
            } else {
                Err(format!("expected 2 error lines, got {errors}"))
            }
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn test_run_skips_malformed_category_and_keeps_aggregating() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &[("a.jpg", "a"), ("b.jpg", "b")]);
        let provider = MockProvider::new()
            .reply(
                b"a",
                r#"{"mood":[{"tag":"tense","weight":9}],"lighting":[{"tag":"harsh"}]}"#,
            )
            .reply(b"b", r#"{"mood":[{"tag":"calm","weight":4}]}"#);
        let tagger = Tagger::new(Box::new(provider), options(dir.path()));

        let run = tagger.run(&files, |_, _| {}).await;

        assert_eq!(run.report.succeeded, 1);
        assert_eq!(run.report.failed.len(), 1);
        assert!(run.report.failed[0].0.ends_with("a.jpg"));
        assert!(run.report.failed[0].1.contains("Malformed 'lighting' tags"));
        assert!(!dir.path().join("tags").join("a.json").exists());
        assert_eq!(
            run.summary.get(Category::Mood).unwrap(),
            &[TagEntry::new("calm", 4.0)]
        );
        assert!(run.summary.get(Category::Lighting).is_none());
        assert!(logs_contain("Failed to process image a.jpg"));
    }

    #[tokio::test]
    async fn test_run_averages_across_images() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &[("a.jpg", "a"), ("b.jpg", "b")]);
        let provider = MockProvider::new()
            .reply(
                b"a",
                r#"{"setting":[{"tag":"beach","weight":10},{"tag":"studio","weight":5}]}"#,
            )
            .reply(b"b", r#"{"setting":[{"tag":"beach","weight":20}],"grain":[]}"#);
        let tagger = Tagger::new(Box::new(provider), options(dir.path()));

        let run = tagger.run(&files, |_, _| {}).await;

        assert_eq!(
            run.summary.get(Category::Setting).unwrap(),
            &[TagEntry::new("beach", 15.0), TagEntry::new("studio", 5.0)]
        );
        assert!(run.summary.get(Category::Grain).is_none());
    }

    #[tokio::test]
    async fn test_run_without_tags_writes_no_aggregate() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &[("a.gif", "a")]);
        let provider = MockProvider::new().reply(b"a", "{}");
        let tagger = Tagger::new(Box::new(provider), options(dir.path()));

        let run = tagger.run(&files, |_, _| {}).await;

        assert_eq!(run.report.succeeded, 1);
        assert!(run.summary.is_empty());
        assert!(run.aggregate_file.is_none());
        assert!(dir.path().join("tags").join("a.json").exists());
        assert!(!dir.path().join("tags").join("aggregated_tags.json").exists());
    }

    #[tokio::test]
    async fn test_run_skips_image_whose_document_cannot_be_saved() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_images(dir.path(), &[("a.jpg", "a")]);
        // A regular file where the tags directory should be.
        std::fs::write(dir.path().join("tags"), "blocker").unwrap();
        let provider =
            MockProvider::new().reply(b"a", r#"{"style":[{"tag":"minimal","weight":3}]}"#);
        let tagger = Tagger::new(Box::new(provider), options(dir.path()));

        let run = tagger.run(&files, |_, _| {}).await;

        assert_eq!(run.report.succeeded, 0);
        assert_eq!(run.report.failed.len(), 1);
        assert!(run.summary.is_empty());
    }
}
