//! Persisting report views as parquet files

use std::fs::File;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::error::Result;
use crate::utils::logging::log_operation_complete;

/// Write record batches to a parquet file, creating parent directories
///
/// All batches must share the schema of the first one.
pub fn write_parquet(batches: &[RecordBatch], path: &Path) -> Result<()> {
    let Some(first) = batches.first() else {
        return Err(anyhow::anyhow!(
            "No batches to write to {}",
            path.display()
        ));
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }

    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("Failed to create file {}: {}", path.display(), e))?;
    let mut writer = ArrowWriter::try_new(file, first.schema(), None)
        .map_err(|e| anyhow::anyhow!("Failed to create parquet writer: {e}"))?;

    let mut rows = 0usize;
    for batch in batches {
        writer
            .write(batch)
            .map_err(|e| anyhow::anyhow!("Failed to write record batch: {e}"))?;
        rows += batch.num_rows();
    }
    writer
        .close()
        .map_err(|e| anyhow::anyhow!("Failed to finalize parquet file: {e}"))?;

    log_operation_complete("wrote", path, rows, None);
    Ok(())
}
