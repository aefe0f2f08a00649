//! Persistence of captions, tag documents and the aggregate.
//!
//! Every output lands next to its siblings under a fixed directory and keeps
//! the source image's base filename with a new extension.

use crate::error::{PipelineError, PipelineResult};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output path for `image` inside `dir`: same stem, new extension.
pub fn output_path(dir: &Path, image: &Path, extension: &str) -> PathBuf {
    let mut name = image.file_stem().unwrap_or(image.as_os_str()).to_os_string();
    name.push(".");
    name.push(extension);
    dir.join(name)
}

/// Write UTF-8 text, creating the parent directory if needed.
pub fn write_text(path: &Path, text: &str) -> PipelineResult<()> {
    ensure_parent(path)?;
    std::fs::write(path, text).map_err(|e| PipelineError::write(path, e))
}

/// Write `item` as 2-space indented JSON, creating the parent directory if needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, item: &T) -> PipelineResult<()> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| PipelineError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, item).map_err(|e| PipelineError::write(path, e))?;
    writeln!(writer).map_err(|e| PipelineError::write(path, e))?;
    writer.flush().map_err(|e| PipelineError::write(path, e))
}

/// Convenience function to serialize an item to a JSON string.
pub fn to_json<T: Serialize + ?Sized>(item: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(item)
    } else {
        serde_json::to_string(item)
    }
}

fn ensure_parent(path: &Path) -> PipelineResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::write(parent, e))
        }
        _ => Ok(()),
    }
}
