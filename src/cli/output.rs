//! CLI output: error mapping from bootstrap errors to stable CLI surface.

use crate::error::ApiError;

/// Map bootstrap errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::ConfigError(msg) => format!("configuration error: {}", msg),
        ApiError::StorageError(err) => format!("store unavailable: {}", err),
    }
}
