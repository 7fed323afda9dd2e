//! Parquet IO
//!
//! Reading source tables into record batches and persisting report views.

pub mod parquet;
pub mod writer;

pub use parquet::{DEFAULT_BATCH_SIZE, find_parquet_files, load_parquet_files_parallel, read_parquet};
pub use writer::write_parquet;
