//! JSON persistence of run results

use crate::extract::{AgentOutput, Product};
use crate::TrawlError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes products to `path` as a pretty-printed JSON array
///
/// Parent directories are created as needed.
///
/// # Returns
///
/// * `Ok(())` - File written
/// * `Err(TrawlError)` - Failed to create or write the file
pub fn write_products_json(path: &Path, products: &[Product]) -> Result<(), TrawlError> {
    write_json(path, &products)?;
    tracing::info!("Wrote {} products to {}", products.len(), path.display());
    Ok(())
}

/// Writes agent output to `path` as pretty-printed JSON
pub fn write_agent_output_json(path: &Path, output: &AgentOutput) -> Result<(), TrawlError> {
    write_json(path, output)?;
    tracing::info!("Wrote agent output to {}", path.display());
    Ok(())
}

/// Reads products previously written by [`write_products_json`]
pub fn read_products_json(path: &Path) -> Result<Vec<Product>, TrawlError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), TrawlError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
