//! Span Suppliers
//!
//! This module turns extracted document layout into the flat, flagged span
//! list that the outline rules consume.
//!
//! ## Architecture
//!
//! ```text
//! Layout dump (pages → blocks → lines → spans, drawings)
//!     ↓
//! [SpanSupplier]
//!     ↓
//! SpanSupply (spans + body style + min font size)
//!     ↓
//! [OutlineEngine]
//!     ↓
//! DocumentOutline
//! ```
//!
//! ## Available Suppliers
//!
//! - `LayoutSupplier` - JSON layout dumps from any PDF layout extractor

pub mod layout;
pub mod supplier;

// Re-export main types
pub use layout::{LayoutBlock, LayoutDrawing, LayoutDump, LayoutLine, LayoutPage, LayoutSpan, LayoutSupplier};
pub use supplier::SpanSupplier;
