// Outliner Core Library
//
// Infers a document outline (title plus H1-H3 headings) from styled text spans.
// Main interface for turning layout dumps into outline JSON.

pub mod config;
pub mod error;
pub mod preprocessors;
pub mod processor;
pub mod rules;
pub mod serialization;
pub mod types;

// Re-export main types and functions for easy use
pub use config::OutlineConfig;
pub use error::{SupplyError, SupplyResult};
pub use preprocessors::{LayoutSupplier, SpanSupplier};
pub use processor::{BatchItem, DocumentProcessor, PipelineStages, StepProfiler};
pub use rules::{fix_hierarchy, refine_outline, DebugConfig, OutlineEngine, OutlineStages};
pub use types::*;
