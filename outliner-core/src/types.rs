use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ===== GEOMETRY =====

/// Axis-aligned box in page coordinates, y growing downwards.
/// Serialized as `[x0, y0, x1, y1]` to match layout dumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// True when `other` lies fully inside this box (edges inclusive).
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.x0 <= other.x0 && self.y0 <= other.y0 && self.x1 >= other.x1 && self.y1 >= other.y1
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x0, y0, x1, y1]: [f32; 4]) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x0, bbox.y0, bbox.x1, bbox.y1]
    }
}

// ===== SPANS & STYLES =====

/// Classification key: rounded font size plus exact (case-sensitive) font name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Style {
    pub font_size: u32,
    pub font_name: String,
}

impl Style {
    pub fn new(font_size: u32, font_name: impl Into<String>) -> Self {
        Self {
            font_size,
            font_name: font_name.into(),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}pt {}", self.font_size, self.font_name)
    }
}

/// A styled run of text as produced by the span supplier. Read-only for the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub bbox: BoundingBox,
    pub text: String,
    pub font_size: u32,
    pub font_name: String,
    pub page_index: u32,
    /// Left edge shared by several blocks on the page (tables, forms, multi-column lists)
    pub in_repeating_column: bool,
    /// Fully enclosed by a drawn, non-filled rectangle
    pub in_bordered_box: bool,
}

impl TextSpan {
    pub fn style(&self) -> Style {
        Style::new(self.font_size, self.font_name.clone())
    }

    pub fn has_style(&self, style: &Style) -> bool {
        self.font_size == style.font_size && self.font_name == style.font_name
    }

    /// Column or box content; never title or heading material.
    pub fn is_layout_noise(&self) -> bool {
        self.in_repeating_column || self.in_bordered_box
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Everything the span supplier hands to the rules for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanSupply {
    pub spans: Vec<TextSpan>,
    /// Dominant running-text style; `(0, "")` when no non-minimal style exists
    pub body_style: Style,
    pub min_font_size: f32,
}

impl SpanSupply {
    pub fn context(&self) -> DocumentContext<'_> {
        DocumentContext {
            body_style: &self.body_style,
            min_font_size: self.min_font_size,
        }
    }
}

/// Per-document read-only scalars threaded through every rule.
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    pub body_style: &'a Style,
    pub min_font_size: f32,
}

// ===== HEADINGS =====

pub const MAX_HEADING_LEVEL: u8 = 3;

/// "H2" -> 2. Missing digits or garbage yield 0 so the fixer passes stay total.
/// Levels outside `u8` (`H300`, `H-1`) are garbage too and also yield 0.
pub fn parse_level_label(label: &str) -> u8 {
    label.replace('H', "").trim().parse::<u8>().unwrap_or(0)
}

pub fn level_label(level: u8) -> String {
    format!("H{level}")
}

/// Heading while it moves through the rules. The style is only needed by the
/// hierarchy fixer and is dropped by [`WorkingHeading::into_heading`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHeading {
    pub level: u8,
    pub text: String,
    pub page: u32,
    pub style: Option<Style>,
}

impl WorkingHeading {
    /// Font size of the heading's style, 0 when the style is unknown.
    pub fn font_size(&self) -> u32 {
        self.style.as_ref().map(|s| s.font_size).unwrap_or(0)
    }

    pub fn into_heading(self) -> Heading {
        Heading {
            level: self.level,
            text: self.text,
            page: self.page,
        }
    }
}

impl From<Heading> for WorkingHeading {
    fn from(heading: Heading) -> Self {
        Self {
            level: heading.level,
            text: heading.text,
            page: heading.page,
            style: None,
        }
    }
}

/// Output heading: `{ "level": "H1", "text": "...", "page": 3 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    #[serde(
        default,
        serialize_with = "serialize_level",
        deserialize_with = "deserialize_level"
    )]
    pub level: u8,
    pub text: String,
    pub page: u32,
}

impl Heading {
    pub fn label(&self) -> String {
        level_label(self.level)
    }
}

fn serialize_level<S: Serializer>(level: &u8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&level_label(*level))
}

fn deserialize_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(parse_level_label).unwrap_or(0))
}

/// The produced structure: title plus headings in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutline {
    pub title: String,
    pub outline: Vec<Heading>,
}
