//! Layout dump supplier
//!
//! Reads the JSON layout dump written by a PDF layout extractor and produces
//! the span list for the outline rules. The dump mirrors the usual extractor
//! shape:
//!
//! - `pages[]` in document order
//! - text `blocks[]` with a bbox, each holding `lines[]` of `spans[]`
//! - `drawings[]` rectangles with a `filled` flag
//!
//! Two layout flags are computed here because they need the page-level view:
//! a span is column content when its block's left edge (bucketed) is shared by
//! several blocks on the page, and boxed content when a non-filled drawn
//! rectangle encloses it.

use crate::config::SupplierConfig;
use crate::error::{SupplyError, SupplyResult};
use crate::preprocessors::supplier::SpanSupplier;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDump {
    #[serde(default)]
    pub pages: Vec<LayoutPage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutPage {
    #[serde(default)]
    pub blocks: Vec<LayoutBlock>,
    #[serde(default)]
    pub drawings: Vec<LayoutDrawing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutBlock {
    pub bbox: BoundingBox,
    #[serde(default)]
    pub lines: Vec<LayoutLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutLine {
    #[serde(default)]
    pub spans: Vec<LayoutSpan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSpan {
    pub bbox: BoundingBox,
    pub text: String,
    /// Unrounded font size in points
    pub size: f32,
    pub font: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDrawing {
    pub rect: BoundingBox,
    #[serde(default)]
    pub filled: bool,
}

pub struct LayoutSupplier {
    config: SupplierConfig,
}

impl Default for LayoutSupplier {
    fn default() -> Self {
        Self::new(SupplierConfig::default())
    }
}

impl LayoutSupplier {
    pub fn new(config: SupplierConfig) -> Self {
        Self { config }
    }

    /// Flatten a parsed dump into flagged spans plus document style statistics.
    pub fn build_supply(&self, dump: &LayoutDump) -> SupplyResult<SpanSupply> {
        let mut spans = Vec::new();
        // (style, characters) in first-seen order so ties resolve to the earliest style
        let mut style_weights: Vec<(Style, usize)> = Vec::new();
        let mut style_slots: HashMap<Style, usize> = HashMap::new();
        let mut min_size: Option<u32> = None;

        for (page_number, page) in dump.pages.iter().enumerate() {
            let page_index = page_number as u32;
            let column_blocks = self.column_blocks(page_index, page)?;
            let borders: Vec<&BoundingBox> = page
                .drawings
                .iter()
                .filter(|drawing| !drawing.filled)
                .map(|drawing| &drawing.rect)
                .collect();

            for (block_index, block) in page.blocks.iter().enumerate() {
                let in_column = column_blocks.contains(&block_index);

                for span in block.lines.iter().flat_map(|line| line.spans.iter()) {
                    let text = span.text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    if !span.bbox.is_finite() {
                        return Err(SupplyError::Geometry {
                            page: page_index,
                            reason: format!("non-finite bbox for span '{text}'"),
                        });
                    }
                    if !span.size.is_finite() || span.size < 0.0 {
                        return Err(SupplyError::Geometry {
                            page: page_index,
                            reason: format!("invalid font size {} for span '{text}'", span.size),
                        });
                    }

                    let font_size = span.size.round_ties_even() as u32;
                    let style = Style::new(font_size, span.font.clone());
                    let slot = *style_slots.entry(style.clone()).or_insert_with(|| {
                        style_weights.push((style, 0));
                        style_weights.len() - 1
                    });
                    style_weights[slot].1 += text.chars().count();
                    min_size = Some(min_size.map_or(font_size, |m| m.min(font_size)));

                    spans.push(TextSpan {
                        bbox: span.bbox,
                        text: text.to_string(),
                        font_size,
                        font_name: span.font.clone(),
                        page_index,
                        in_repeating_column: in_column,
                        in_bordered_box: borders.iter().any(|rect| rect.contains(&span.bbox)),
                    });
                }
            }
        }

        let min_font_size = min_size.unwrap_or(0) as f32;
        let body_style = body_style(&style_weights, min_font_size);

        log::info!(
            "✅ Layout supply complete: {} spans over {} pages, body style {}, min size {}",
            spans.len(),
            dump.pages.len(),
            body_style,
            min_font_size
        );

        Ok(SpanSupply {
            spans,
            body_style,
            min_font_size,
        })
    }

    /// Indices of blocks whose bucketed left edge is shared by enough blocks on the page.
    fn column_blocks(&self, page_index: u32, page: &LayoutPage) -> SupplyResult<HashSet<usize>> {
        let bucket = self.config.column_bucket;
        let mut by_edge: HashMap<i64, Vec<usize>> = HashMap::new();

        for (block_index, block) in page.blocks.iter().enumerate() {
            if !block.bbox.x0.is_finite() {
                return Err(SupplyError::Geometry {
                    page: page_index,
                    reason: format!("non-finite bbox for block {block_index}"),
                });
            }
            let key = if bucket > 0.0 {
                (block.bbox.x0 / bucket).round_ties_even() as i64
            } else {
                block.bbox.x0.round_ties_even() as i64
            };
            by_edge.entry(key).or_default().push(block_index);
        }

        Ok(by_edge
            .into_values()
            .filter(|blocks| blocks.len() >= self.config.column_min_blocks)
            .flatten()
            .collect())
    }
}

/// Character-weighted most common style among sizes above the minimum.
fn body_style(style_weights: &[(Style, usize)], min_font_size: f32) -> Style {
    let mut best: Option<&(Style, usize)> = None;
    for entry in style_weights {
        if entry.0.font_size as f32 <= min_font_size {
            continue;
        }
        if best.map_or(true, |b| entry.1 > b.1) {
            best = Some(entry);
        }
    }
    best.map(|(style, _)| style.clone()).unwrap_or_default()
}

impl SpanSupplier for LayoutSupplier {
    fn supply(&self, bytes: &[u8]) -> SupplyResult<SpanSupply> {
        let dump: LayoutDump = serde_json::from_slice(bytes)?;
        self.build_supply(&dump)
    }

    fn name(&self) -> &str {
        "LayoutSupplier"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        if let Some(extension) = path.extension() {
            matches!(
                extension.to_str().unwrap_or("").to_lowercase().as_str(),
                "json"
            )
        } else {
            false
        }
    }
}
