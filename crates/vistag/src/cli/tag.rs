//! The `vistag tag` command.

use std::time::Instant;

use vistag_core::{output, Config, TagOptions, Tagger};

use super::setup::{
    apply_overrides, create_progress_bar, create_provider, discover_images, print_summary,
    OutputTarget,
};
use super::RunArgs;

/// Execute the tag command.
///
/// Per-image documents go to the tags directory, the aggregate next to them,
/// and the pretty-printed aggregate to stdout.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args, OutputTarget::Tags)?;

    // Missing system message or credentials abort before any image is touched.
    let options = TagOptions::from_config(&config)?;
    let provider = create_provider(&args, &config)?;

    let files = discover_images(&config)?;
    if files.is_empty() {
        return Ok(());
    }

    let tagger = Tagger::new(provider, options);
    let progress = create_progress_bar(files.len() as u64);
    let start = Instant::now();

    let run = tagger
        .run(&files, |file, ok| {
            let name = file.name();
            progress.set_message(if ok { name } else { format!("{name} (failed)") });
            progress.inc(1);
        })
        .await;

    progress.finish_and_clear();
    print_summary(&run.report, start.elapsed());

    if !run.summary.is_empty() {
        tracing::info!("Aggregated Tags Summary:");
        println!("{}", output::to_json(&run.summary, true)?);
    }
    Ok(())
}
