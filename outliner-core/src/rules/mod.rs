// Main rules module - delegates to semantic sub-modules
// This file coordinates the rule system but actual implementations are in:
// - engine.rs: OutlineEngine, stage capture and debug tracing
// - title_detection.rs: Centred title block on the first page
// - candidate_filter.rs: Heading candidate selection
// - style_rank.rs: Style ranking and provisional levels
// - hierarchy_fixer.rs: Level clamping and font-size consistency
// - validation.rs: Final structural report

pub mod candidate_filter;
pub mod engine;
pub mod hierarchy_fixer;
pub mod style_rank;
pub mod title_detection;
pub mod validation;

pub use engine::*;
pub use hierarchy_fixer::{fix_hierarchy, refine_outline};
pub use title_detection::TitleMatch;
pub use validation::{ValidationIssue, ValidationReport};
