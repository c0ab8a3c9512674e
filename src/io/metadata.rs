//! Metadata and series descriptor JSON documents.
//!
//! Both are regenerated in full on every successful run.

use std::io::Write;
use std::path::Path;

use crate::domain::{RunMetadata, SeriesDescriptor};
use crate::error::AppError;
use crate::io::export::{create_output, write_error};

/// Write the run metadata document.
pub fn write_metadata_json(path: &Path, metadata: &RunMetadata) -> Result<(), AppError> {
    write_pretty_json(path, metadata)?;
    tracing::debug!(path = %path.display(), "saved run metadata");
    Ok(())
}

/// Write the series descriptor document.
pub fn write_descriptor_json(path: &Path, descriptor: &SeriesDescriptor) -> Result<(), AppError> {
    write_pretty_json(path, descriptor)?;
    tracing::debug!(path = %path.display(), symbol = %descriptor.symbol, "saved series descriptor");
    Ok(())
}

fn write_pretty_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let mut out = create_output(path)?;
    serde_json::to_writer_pretty(&mut out, value).map_err(|e| write_error(path, e))?;
    writeln!(out).map_err(|e| write_error(path, e))?;
    out.flush().map_err(|e| write_error(path, e))?;
    Ok(())
}
