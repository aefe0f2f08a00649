//! The `vistag caption` command.

use std::time::Instant;

use vistag_core::{CaptionOptions, Captioner, Config};

use super::setup::{
    apply_overrides, create_progress_bar, create_provider, discover_images, print_summary,
    OutputTarget,
};
use super::RunArgs;

/// Execute the caption command.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args, OutputTarget::Captions)?;

    // Missing system message or credentials abort before any image is touched.
    let options = CaptionOptions::from_config(&config)?;
    let provider = create_provider(&args, &config)?;

    let files = discover_images(&config)?;
    if files.is_empty() {
        return Ok(());
    }

    let captioner = Captioner::new(provider, options);
    let progress = create_progress_bar(files.len() as u64);
    let start = Instant::now();

    let report = captioner
        .run(&files, |file, ok| {
            let name = file.name();
            progress.set_message(if ok { name } else { format!("{name} (failed)") });
            progress.inc(1);
        })
        .await;

    progress.finish_and_clear();
    print_summary(&report, start.elapsed());
    Ok(())
}
