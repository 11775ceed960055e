//! Error types for the tamarack report-mining library.

use thiserror::Error;

/// Primary error type for report-mining operations.
///
/// Expected misses (unknown NTS identifier, image with no caption, no table
/// of contents detected) are modelled as `Option`/empty results, not errors.
/// This enum only covers genuine faults in caller-supplied resources.
#[derive(Error, Debug)]
pub enum TamarackError {
    #[error("invalid NTS table resource: {0}")]
    NtsTableJson(#[from] serde_json::Error),

    #[error("invalid NTS table entry {id}: expected a 4-element bounding box, got {len} elements")]
    NtsTableEntry { id: String, len: usize },
}

/// Convenience Result type alias for TamarackError.
pub type Result<T> = std::result::Result<T, TamarackError>;
