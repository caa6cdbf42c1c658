use crate::config::OutlineConfig;
use crate::types::*;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use super::candidate_filter::CandidateFilterRule;
use super::hierarchy_fixer::fix_hierarchy;
use super::style_rank::StyleRankRule;
use super::title_detection::{TitleDetectionRule, TitleMatch};
use super::validation::{ValidationReport, ValidationRule};

// Debug configuration for pipeline tracing
#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    pub enabled: bool,
    pub filter_patterns: Vec<String>,
}

impl DebugConfig {
    pub fn new(enabled: bool, filter_patterns: Vec<String>) -> Self {
        Self {
            enabled,
            filter_patterns,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    fn matcher(&self) -> Vec<TextMatcher> {
        self.filter_patterns
            .iter()
            .map(|pattern| match Regex::new(pattern) {
                Ok(regex) => TextMatcher::Regex(regex),
                Err(_) => TextMatcher::Contains(pattern.clone()),
            })
            .collect()
    }
}

enum TextMatcher {
    Regex(Regex),
    Contains(String),
}

impl TextMatcher {
    fn is_match(&self, text: &str) -> bool {
        match self {
            TextMatcher::Regex(regex) => regex.is_match(text),
            TextMatcher::Contains(needle) => text.contains(needle.as_str()),
        }
    }
}

/// Anything the pipeline can trace by text.
pub trait Traceable {
    fn trace_text(&self) -> &str;
    fn trace_detail(&self) -> String;
}

impl Traceable for TextSpan {
    fn trace_text(&self) -> &str {
        &self.text
    }

    fn trace_detail(&self) -> String {
        format!("{}, page {}, y {:.1}", self.style(), self.page_index, self.bbox.y0)
    }
}

impl Traceable for WorkingHeading {
    fn trace_text(&self) -> &str {
        &self.text
    }

    fn trace_detail(&self) -> String {
        format!("{}, page {}, {}pt", level_label(self.level), self.page, self.font_size())
    }
}

impl<T: Traceable> Traceable for &T {
    fn trace_text(&self) -> &str {
        (**self).trace_text()
    }

    fn trace_detail(&self) -> String {
        (**self).trace_detail()
    }
}

/// Debug utility function to trace items through the pipeline
pub fn debug_pipeline_items<T: Traceable>(stage: &str, items: &[T], debug_config: &DebugConfig) {
    if !debug_config.enabled || debug_config.filter_patterns.is_empty() {
        return;
    }

    let matchers = debug_config.matcher();
    let matching: Vec<_> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matchers.iter().any(|m| m.is_match(item.trace_text())))
        .collect();

    if matching.is_empty() {
        return;
    }

    log::info!("🔍 [{}] {} matching items:", stage, matching.len());
    for (index, item) in matching {
        let text = item.trace_text();
        let preview: String = if text.chars().count() > 50 {
            format!("{}...", text.chars().take(47).collect::<String>())
        } else {
            text.to_string()
        };
        log::info!("  Item {}: \"{}\" ({})", index, preview, item.trace_detail());
    }
}

/// Every intermediate result of one inference run.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineStages {
    pub title: Option<TitleMatch>,
    pub candidates: Vec<TextSpan>,
    pub provisional: Vec<WorkingHeading>,
    pub fixed: Vec<WorkingHeading>,
    pub outline: DocumentOutline,
    pub validation: Option<ValidationReport>,
}

/// Runs title detection, candidate filtering, classification and hierarchy
/// fixing over one document's spans. Holds no per-document state.
pub struct OutlineEngine {
    config: OutlineConfig,
    debug_config: DebugConfig,
}

impl OutlineEngine {
    pub fn new(config: OutlineConfig) -> Self {
        Self {
            config,
            debug_config: DebugConfig::disabled(),
        }
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.debug_config = debug_config;
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    pub fn run(&self, supply: &SpanSupply) -> DocumentOutline {
        self.run_with_stages(supply).outline
    }

    pub fn run_with_stages(&self, supply: &SpanSupply) -> OutlineStages {
        let ctx = supply.context();
        log::info!(
            "⚙️  Inferring outline from {} spans (body {}, min size {:.1})",
            supply.spans.len(),
            supply.body_style,
            supply.min_font_size
        );

        // STEP 1: Title
        let title_rule = TitleDetectionRule::new(&self.config.title);
        let title = title_rule.detect(&supply.spans, ctx);
        let title_spans: HashSet<usize> = title
            .as_ref()
            .map(|t| t.span_indices.iter().copied().collect())
            .unwrap_or_default();
        match &title {
            Some(t) => log::info!("   📰 [{}] \"{}\" ({} spans)", title_rule.name(), t.text, t.span_indices.len()),
            None => log::info!("   📰 [{}] no title found", title_rule.name()),
        }

        // STEP 2: Candidates from everything the title did not claim
        let residual: Vec<&TextSpan> = supply
            .spans
            .iter()
            .enumerate()
            .filter(|(index, _)| !title_spans.contains(index))
            .map(|(_, span)| span)
            .collect();
        let filter_rule = CandidateFilterRule::new(&self.config.candidates);
        let candidates = filter_rule.select(&residual, ctx);
        debug_pipeline_items(filter_rule.name(), &candidates, &self.debug_config);
        log::info!("   ✅ [{}] {} candidates", filter_rule.name(), candidates.len());

        // STEP 3: Provisional levels
        let rank_rule = StyleRankRule::new(&self.config.classifier);
        let provisional = rank_rule.classify(&candidates);
        debug_pipeline_items(rank_rule.name(), &provisional, &self.debug_config);
        log::info!("   ✅ [{}] {} headings", rank_rule.name(), provisional.len());

        // STEP 4: Hierarchy repair
        let mut fixed = provisional.clone();
        fix_hierarchy(&mut fixed);
        debug_pipeline_items("HierarchyFixer", &fixed, &self.debug_config);

        let outline = DocumentOutline {
            title: title.as_ref().map(|t| t.text.clone()).unwrap_or_default(),
            outline: fixed.iter().cloned().map(WorkingHeading::into_heading).collect(),
        };

        // STEP 5: Report-only validation
        let validation = if self.config.pipeline.validate {
            Some(ValidationRule::new(&self.config).validate(&outline))
        } else {
            None
        };

        OutlineStages {
            title,
            candidates: candidates.into_iter().cloned().collect(),
            provisional,
            fixed,
            outline,
            validation,
        }
    }
}
