//! Shared setup for the batch commands: config overrides, provider creation,
//! discovery, progress and the closing summary.

use std::time::Duration;

use vistag_core::{
    BatchReport, Config, ConfigError, DiscoveredFile, FileDiscovery, LlmProviderFactory,
};

use super::RunArgs;

/// Which output directory `--output` overrides.
#[derive(Clone, Copy, Debug)]
pub enum OutputTarget {
    Captions,
    Tags,
}

/// Fold CLI flags into the loaded configuration and re-validate it.
pub fn apply_overrides(
    config: &mut Config,
    args: &RunArgs,
    target: OutputTarget,
) -> Result<(), ConfigError> {
    if let Some(ref input) = args.input {
        config.paths.images_dir = input.to_string_lossy().into_owned();
    }
    if let Some(ref output) = args.output {
        let output = output.to_string_lossy().into_owned();
        match target {
            OutputTarget::Captions => config.paths.captions_dir = output,
            OutputTarget::Tags => config.paths.tags_dir = output,
        }
    }
    if let Some(llm) = args.llm {
        config.llm.provider = llm.to_string();
    }
    config.validate()
}

/// Build the one provider used for the whole run.
pub fn create_provider(
    args: &RunArgs,
    config: &Config,
) -> anyhow::Result<Box<dyn vistag_core::LlmProvider>> {
    let provider = LlmProviderFactory::create(
        &config.llm.provider,
        &config.llm,
        args.model.as_deref(),
        Duration::from_millis(config.limits.llm_timeout_ms),
    )?;
    tracing::debug!("Using {} provider", provider.name());
    Ok(provider)
}

/// List the images to process, creating the input directory if it is missing.
pub fn discover_images(config: &Config) -> anyhow::Result<Vec<DiscoveredFile>> {
    let dir = config.images_dir();
    std::fs::create_dir_all(&dir)?;

    let files = FileDiscovery::new(&config.processing).discover(&dir);
    if files.is_empty() {
        tracing::warn!("No supported image files found in {:?}", dir);
    } else {
        tracing::info!(
            "Found {} image(s) to process ({:.1} MB)",
            files.len(),
            FileDiscovery::total_size(&files) as f64 / 1_000_000.0
        );
    }
    Ok(files)
}

/// Create a progress bar for batch processing.
pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}

/// Print a formatted summary table after batch processing.
pub fn print_summary(report: &BatchReport, elapsed: Duration) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", report.succeeded);
    if !report.failed.is_empty() {
        eprintln!("    Failed:       {:>8}", report.failed.len());
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", report.total());
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
    for (path, reason) in &report.failed {
        eprintln!("    {}: {}", path.display(), reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LlmProvider;
    use std::path::PathBuf;

    #[test]
    fn overrides_leave_config_alone_by_default() {
        let mut config = Config::default();
        apply_overrides(&mut config, &RunArgs::default(), OutputTarget::Tags).unwrap();
        assert_eq!(config.paths.images_dir, "images");
        assert_eq!(config.paths.tags_dir, "tags");
        assert_eq!(config.llm.provider, "openai");
    }

    #[test]
    fn output_override_targets_the_right_directory() {
        let args = RunArgs {
            output: Some(PathBuf::from("out")),
            ..RunArgs::default()
        };

        let mut config = Config::default();
        apply_overrides(&mut config, &args, OutputTarget::Captions).unwrap();
        assert_eq!(config.paths.captions_dir, "out");
        assert_eq!(config.paths.tags_dir, "tags");

        let mut config = Config::default();
        apply_overrides(&mut config, &args, OutputTarget::Tags).unwrap();
        assert_eq!(config.paths.tags_dir, "out");
        assert_eq!(config.aggregate_path(), PathBuf::from("out/aggregated_tags.json"));
    }

    #[test]
    fn input_and_provider_overrides() {
        let args = RunArgs {
            input: Some(PathBuf::from("pins")),
            llm: Some(LlmProvider::Anthropic),
            ..RunArgs::default()
        };
        let mut config = Config::default();
        apply_overrides(&mut config, &args, OutputTarget::Captions).unwrap();
        assert_eq!(config.paths.images_dir, "pins");
        assert_eq!(config.llm.provider, "anthropic");
    }

    #[test]
    fn overrides_are_validated() {
        let args = RunArgs {
            input: Some(PathBuf::from("shared")),
            output: Some(PathBuf::from("shared")),
            ..RunArgs::default()
        };
        let mut config = Config::default();
        let err = apply_overrides(&mut config, &args, OutputTarget::Tags).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("paths.images_dir"));
    }

    #[test]
    fn create_provider_for_ollama_needs_no_credentials() {
        let args = RunArgs {
            llm: Some(LlmProvider::Ollama),
            ..RunArgs::default()
        };
        let mut config = Config::default();
        apply_overrides(&mut config, &args, OutputTarget::Tags).unwrap();
        let provider = create_provider(&args, &config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn discover_images_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        let mut config = Config::default();
        config.paths.images_dir = images.to_string_lossy().into_owned();

        let files = discover_images(&config).unwrap();
        assert!(files.is_empty());
        assert!(images.is_dir());
    }
}
