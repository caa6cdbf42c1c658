// Span supplier abstraction
//
// This module defines the boundary between layout extraction (document -> spans)
// and outline inference (spans -> title + headings). Everything after this point
// works with TextSpans and is format-agnostic.

use crate::error::{SupplyError, SupplyResult};
use crate::types::SpanSupply;
use std::path::Path;

/// SpanSupplier trait - converts raw input into flagged spans
///
/// Suppliers handle:
/// - Input format parsing
/// - Font size rounding and text trimming
/// - Layout flags (repeating columns, bordered boxes)
/// - Document-level style statistics (body style, minimum font size)
pub trait SpanSupplier: Send + Sync {
    /// Convert input bytes to spans
    fn supply(&self, bytes: &[u8]) -> SupplyResult<SpanSupply>;

    /// Convenience method: read the file and supply from its bytes
    fn supply_file(&self, input: &Path) -> SupplyResult<SpanSupply> {
        if !self.supports_file_type(input) {
            return Err(SupplyError::Unsupported(format!(
                "{} cannot read {}",
                self.name(),
                input.display()
            )));
        }
        let bytes = std::fs::read(input)?;
        self.supply(&bytes)
    }

    /// Get supplier name for logging
    fn name(&self) -> &str;

    /// Check if supplier supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}
