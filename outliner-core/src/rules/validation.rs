use crate::config::OutlineConfig;
use crate::types::*;
use serde::Serialize;

// ValidationRule - structural checks on the finished outline (report only)
pub struct ValidationRule<'a> {
    config: &'a OutlineConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub quality_score: f32,
    pub total_headings: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ValidationIssue {
    FirstNotH1 {
        level: u8,
    },
    LevelJump {
        from: u8,
        to: u8,
        position: usize,
    },
    LevelOutOfRange {
        level: u8,
        position: usize,
    },
    TextLength {
        position: usize,
        length: usize,
        text_preview: String,
    },
    TitleTooLong {
        length: usize,
    },
    TitleSingleWord {
        title: String,
    },
    TitleReused {
        position: usize,
        text: String,
    },
}

impl<'a> ValidationRule<'a> {
    pub fn new(config: &'a OutlineConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        "StructuralValidation"
    }

    pub fn validate(&self, outline: &DocumentOutline) -> ValidationReport {
        let mut issues = Vec::new();
        let total_headings = outline.outline.len();

        // 1. Level sequence
        self.validate_levels(&outline.outline, &mut issues);

        // 2. Heading text bounds
        self.validate_heading_text(&outline.outline, &mut issues);

        // 3. Title shape and exclusivity
        self.validate_title(outline, &mut issues);

        let quality_score = if total_headings == 0 {
            1.0
        } else {
            (1.0 - (issues.len() as f32 / total_headings as f32)).max(0.0)
        };

        let report = ValidationReport {
            issues,
            quality_score,
            total_headings,
        };
        self.log_report(&report);
        report
    }

    fn validate_levels(&self, headings: &[Heading], issues: &mut Vec<ValidationIssue>) {
        let max_level = self.config.classifier.max_level;

        if let Some(first) = headings.first() {
            if first.level != 1 {
                issues.push(ValidationIssue::FirstNotH1 { level: first.level });
            }
        }

        let mut max_seen: u8 = 0;
        for (i, heading) in headings.iter().enumerate() {
            if heading.level == 0 || heading.level > max_level {
                issues.push(ValidationIssue::LevelOutOfRange {
                    level: heading.level,
                    position: i,
                });
            }
            if i > 0 && heading.level > max_seen.saturating_add(1) {
                issues.push(ValidationIssue::LevelJump {
                    from: max_seen,
                    to: heading.level,
                    position: i,
                });
            }
            max_seen = max_seen.max(heading.level);
        }
    }

    fn validate_heading_text(&self, headings: &[Heading], issues: &mut Vec<ValidationIssue>) {
        let classifier = &self.config.classifier;
        for (i, heading) in headings.iter().enumerate() {
            let length = heading.text.chars().count();
            if length < classifier.min_length || length > classifier.max_length {
                issues.push(ValidationIssue::TextLength {
                    position: i,
                    length,
                    text_preview: heading.text.chars().take(50).collect(),
                });
            }
        }
    }

    fn validate_title(&self, outline: &DocumentOutline, issues: &mut Vec<ValidationIssue>) {
        let title = outline.title.trim();
        if title.is_empty() {
            return;
        }

        let length = title.chars().count();
        if length > self.config.title.max_length {
            issues.push(ValidationIssue::TitleTooLong { length });
        }
        if title.split_whitespace().count() < 2 {
            issues.push(ValidationIssue::TitleSingleWord {
                title: title.to_string(),
            });
        }

        for (i, heading) in outline.outline.iter().enumerate() {
            let text = heading.text.trim();
            if !text.is_empty() && title.contains(text) {
                issues.push(ValidationIssue::TitleReused {
                    position: i,
                    text: text.to_string(),
                });
            }
        }
    }

    fn log_report(&self, report: &ValidationReport) {
        log::info!(
            "📊 Validation: quality {:.2}/1.00, {} issue(s) over {} heading(s)",
            report.quality_score,
            report.issues.len(),
            report.total_headings
        );

        for issue in &report.issues {
            match issue {
                ValidationIssue::FirstNotH1 { level } => {
                    log::debug!("   outline starts at H{} instead of H1", level);
                }
                ValidationIssue::LevelJump { from, to, position } => {
                    log::debug!("   level jump at {}: deepest so far H{}, got H{}", position, from, to);
                }
                ValidationIssue::LevelOutOfRange { level, position } => {
                    log::debug!("   level H{} out of range at {}", level, position);
                }
                ValidationIssue::TextLength {
                    position,
                    length,
                    text_preview,
                } => {
                    log::debug!("   heading at {} has {} chars: \"{}\"", position, length, text_preview);
                }
                ValidationIssue::TitleTooLong { length } => {
                    log::debug!("   title has {} chars", length);
                }
                ValidationIssue::TitleSingleWord { title } => {
                    log::debug!("   single-word title \"{}\"", title);
                }
                ValidationIssue::TitleReused { position, text } => {
                    log::debug!("   heading at {} repeats title text \"{}\"", position, text);
                }
            }
        }
    }
}
