//! Error types for the span-supplier boundary.
//!
//! The outline rules themselves never fail; only turning raw input into spans can.

use std::io;
use thiserror::Error;

/// Result type alias for span supply.
pub type SupplyResult<T> = std::result::Result<T, SupplyError>;

/// Errors that can occur while turning a layout dump into spans.
#[derive(Error, Debug)]
pub enum SupplyError {
    /// I/O error when reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a well-formed layout dump.
    #[error("Malformed layout dump: {0}")]
    Format(#[from] serde_json::Error),

    /// Coordinates or font sizes that cannot be compared.
    #[error("Invalid geometry on page {page}: {reason}")]
    Geometry { page: u32, reason: String },

    /// The supplier does not handle this kind of input.
    #[error("Unsupported input: {0}")]
    Unsupported(String),
}
