//! Logging utilities
//!
//! Standardized logging for analysis and IO operations.

use std::path::Path;
use std::time::Duration;

/// Log the start of a file or directory operation
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log the completion of a file or directory operation
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} items from {} in {:?}",
            operation,
            items,
            path.display(),
            duration
        );
    } else {
        log::info!(
            "Successfully {} {} items from {}",
            operation,
            items,
            path.display()
        );
    }
}

/// Log the completion of an analysis pass
pub fn log_analysis_complete(analysis: &str, rows: usize, elapsed: Duration) {
    log::info!("{analysis}: produced {rows} rows in {elapsed:?}");
}

/// Log a warning, optionally tied to a path
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
