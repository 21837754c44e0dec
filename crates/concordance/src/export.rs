use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use inscription_types::LemmaEntry;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write concordance: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize concordance: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize `entries` as a JSON array.
pub fn write_json<W: Write>(
    writer: W,
    entries: &[LemmaEntry],
    pretty: bool,
) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(writer);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, entries)?;
    } else {
        serde_json::to_writer(&mut writer, entries)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn write_json_file(
    path: impl AsRef<Path>,
    entries: &[LemmaEntry],
    pretty: bool,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_json(file, entries, pretty)
}
