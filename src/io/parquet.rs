//! Parquet file operations
//!
//! Reading source tables into Arrow record batches, with optional column
//! projection and optional row filtering on an identifier column.

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{Array, BooleanArray};
use arrow::compute::filter_record_batch;
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::utils::arrow::string_column;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Keep only rows whose value in `id_column` is in the given set
fn filter_batch_by_id(
    batch: &RecordBatch,
    id_column: &str,
    ids: &FxHashSet<String>,
) -> Result<RecordBatch> {
    let column = string_column(batch, id_column)?;
    let mask: BooleanArray = (0..batch.num_rows())
        .map(|row| Some(!column.is_null(row) && ids.contains(column.value(row))))
        .collect();
    Ok(filter_record_batch(batch, &mask)?)
}

/// Build a projection mask selecting the schema's columns from the file
///
/// Columns missing from the file are skipped with a warning; if nothing
/// matches, all columns are read.
fn create_projection(
    schema: &Schema,
    file_schema: &Schema,
    parquet_schema: &parquet::schema::types::SchemaDescriptor,
) -> Option<ProjectionMask> {
    let projection: Vec<usize> = schema
        .fields()
        .iter()
        .filter_map(|field| {
            file_schema.index_of(field.name()).map_or_else(
                |_| {
                    log_warning(
                        &format!("Field {} not found in parquet file, skipping", field.name()),
                        None,
                    );
                    None
                },
                Some,
            )
        })
        .collect_vec();

    if projection.is_empty() {
        log_warning(
            "No matching fields found in schema projection, reading all columns",
            None,
        );
        None
    } else {
        Some(ProjectionMask::leaves(parquet_schema, projection))
    }
}

/// Read a parquet file into Arrow record batches
///
/// # Arguments
/// * `path` - Path to the Parquet file
/// * `schema` - Optional Arrow schema for projecting specific columns
/// * `id_filter` - Optional (column, id set) pair to keep only matching rows
pub fn read_parquet(
    path: &Path,
    schema: Option<&Schema>,
    id_filter: Option<(&str, &FxHashSet<String>)>,
) -> Result<Vec<RecordBatch>> {
    let start = std::time::Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open file {}: {}", path.display(), e))?;
    let reader_builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| anyhow::anyhow!("Failed to read parquet file {}: {}", path.display(), e))?
        .with_batch_size(DEFAULT_BATCH_SIZE);

    let reader = if let Some(schema) = schema {
        let file_schema = reader_builder.schema().as_ref().clone();
        match create_projection(schema, &file_schema, reader_builder.parquet_schema()) {
            Some(mask) => reader_builder
                .with_projection(mask)
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to build projected parquet reader: {e}"))?,
            None => reader_builder
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to build parquet reader: {e}"))?,
        }
    } else {
        reader_builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build parquet reader: {e}"))?
    };

    let mut batches = Vec::new();
    for batch_result in reader {
        let batch =
            batch_result.map_err(|e| anyhow::anyhow!("Failed to read record batch: {e}"))?;
        let batch = match id_filter {
            Some((column, ids)) => {
                let filtered = filter_batch_by_id(&batch, column, ids)?;
                if filtered.num_rows() == 0 {
                    continue;
                }
                filtered
            }
            None => batch,
        };
        batches.push(batch);
    }

    log_operation_complete("read", path, batches.len(), Some(start.elapsed()));
    Ok(batches)
}

/// Find all Parquet files in a directory, sorted by file name
pub fn find_parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    log_operation_start("Searching for parquet files in", dir);

    if !dir.exists() || !dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Directory does not exist: {}",
            dir.display()
        ));
    }

    let parquet_files = std::fs::read_dir(dir)
        .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?
        .filter_map(|entry_result| match entry_result {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "parquet") {
                    Some(Ok(path))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(anyhow::anyhow!("Failed to read directory entry: {e}"))),
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        // Name order keeps multi-file loads deterministic
        .sorted()
        .collect_vec();

    if parquet_files.is_empty() {
        log_warning("No Parquet files found in directory", Some(dir));
    } else {
        log_operation_complete("found", dir, parquet_files.len(), None);
    }

    Ok(parquet_files)
}

/// Load all parquet files from a directory in parallel
///
/// Files are read with rayon; batches come back in file-name order.
pub fn load_parquet_files_parallel(
    dir: &Path,
    schema: Option<&Schema>,
    id_filter: Option<(&str, &FxHashSet<String>)>,
) -> Result<Vec<RecordBatch>> {
    let parquet_files = find_parquet_files(dir)?;
    if parquet_files.is_empty() {
        return Ok(Vec::new());
    }

    let all_batches: Vec<Result<Vec<RecordBatch>>> = parquet_files
        .par_iter()
        .map(|path| read_parquet(path, schema, id_filter))
        .collect();

    let mut combined_batches = Vec::new();
    for result in all_batches {
        combined_batches.extend(result?);
    }

    log::info!(
        "Successfully loaded {} batches from {} Parquet files",
        combined_batches.len(),
        parquet_files.len()
    );

    Ok(combined_batches)
}
