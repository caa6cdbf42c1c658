use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_bold_indicators() -> Vec<String> {
    vec![
        "bold".to_string(),
        "black".to_string(),
        "heavy".to_string(),
        "oblique".to_string(),
    ]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Title block detection on the first page
    #[serde(default)]
    pub title: TitleConfig,
    /// Heading candidate filtering
    #[serde(default)]
    pub candidates: CandidateConfig,
    /// Style ranking and provisional level assignment
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Layout dump -> span flags
    #[serde(default)]
    pub supplier: SupplierConfig,
    /// Pipeline switches
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// Page the title is searched on (0-based page index)
    pub page_index: u32,
    /// A title may not start below this fraction of the page height
    pub vertical_cutoff_ratio: f32,
    /// Max distance of the title centre from the page centre, as a fraction of page width
    pub center_tolerance_ratio: f32,
    /// Max vertical gap to the next title line, as a multiple of the last line's font size
    pub merge_gap_factor: f32,
    /// Styles used by more candidates than this are too common to be a title
    pub max_style_repeats: usize,
    /// Max title length in characters
    pub max_length: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            page_index: 0,
            vertical_cutoff_ratio: 0.6,
            center_tolerance_ratio: 0.15,
            merge_gap_factor: 1.8,
            max_style_repeats: 3,
            max_length: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Spans with more words than this are body text, never headings
    pub max_words: usize,
    /// Lowercase fragments of font names that indicate a bold face
    #[serde(default = "default_bold_indicators")]
    pub bold_indicators: Vec<String>,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            max_words: 25,
            bold_indicators: default_bold_indicators(),
        }
    }
}

impl CandidateConfig {
    pub fn is_bold(&self, font_name: &str) -> bool {
        let lower = font_name.to_lowercase();
        self.bold_indicators
            .iter()
            .any(|indicator| lower.contains(indicator.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Max gap to merge the next same-style candidate, as a multiple of the font size
    pub merge_gap_factor: f32,
    /// Inclusive heading length bounds in characters
    pub min_length: usize,
    pub max_length: usize,
    /// Deepest heading level emitted
    pub max_level: u8,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            merge_gap_factor: 1.5,
            min_length: 7,
            max_length: 87,
            max_level: crate::types::MAX_HEADING_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierConfig {
    /// Block left edges are rounded to the nearest multiple of this before grouping
    pub column_bucket: f32,
    /// Blocks sharing a bucket at or above this count are column content
    pub column_min_blocks: usize,
}

impl Default for SupplierConfig {
    fn default() -> Self {
        Self {
            column_bucket: 10.0,
            column_min_blocks: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Run structural validation on the final outline (report only)
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { validate: true }
    }
}

impl OutlineConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {path}"))?;
        let config: OutlineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {path}"))?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                log::warn!("⚠️  Failed to load config from {p} ({e:#}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
