use crate::config::ClassifierConfig;
use crate::types::*;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Distinct candidate styles, largest font first. Equal sizes are ordered by
/// font name so the ranking does not depend on hashing order.
pub fn rank_styles(candidates: &[&TextSpan]) -> Vec<Style> {
    let mut styles: Vec<Style> = Vec::new();
    for span in candidates {
        if !styles.iter().any(|style| span.has_style(style)) {
            styles.push(span.style());
        }
    }
    styles.sort_by(|a, b| {
        b.font_size
            .cmp(&a.font_size)
            .then_with(|| a.font_name.cmp(&b.font_name))
    });
    styles
}

// StyleRankRule - assigns provisional H1-H3 levels from relative style rank
pub struct StyleRankRule<'a> {
    config: &'a ClassifierConfig,
}

impl<'a> StyleRankRule<'a> {
    pub fn new(config: &'a ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        "StyleRank"
    }

    pub fn classify(&self, candidates: &[&TextSpan]) -> Vec<WorkingHeading> {
        let ranking = rank_styles(candidates);
        let rank_of: HashMap<&Style, usize> = ranking
            .iter()
            .enumerate()
            .map(|(rank, style)| (style, rank))
            .collect();

        log::debug!("style ranking: {:?}", ranking.iter().map(|s| s.to_string()).collect::<Vec<_>>());

        let mut headings: Vec<WorkingHeading> = Vec::new();
        // (rank, level) of the last accepted heading
        let mut previous: Option<(usize, u8)> = None;

        let mut i = 0;
        while i < candidates.len() {
            let span = candidates[i];
            let style = span.style();
            let rank = rank_of.get(&style).copied().unwrap_or(0);
            let level = self.level_for(rank, previous);

            let mut text = span.text.clone();
            if let Some(next) = candidates.get(i + 1) {
                let gap = next.bbox.y0 - span.bbox.y1;
                if next.has_style(&style) && gap < span.font_size as f32 * self.config.merge_gap_factor {
                    text.push(' ');
                    text.push_str(&next.text);
                    i += 1;
                }
            }

            let cleaned = text.trim();
            if self.is_acceptable(cleaned) {
                headings.push(WorkingHeading {
                    level,
                    text: cleaned.to_string(),
                    page: span.page_index,
                    style: Some(style),
                });
                previous = Some((rank, level));
            } else {
                log::debug!("candidate '{}' rejected by text checks", cleaned);
            }
            i += 1;
        }

        headings
    }

    fn level_for(&self, rank: usize, previous: Option<(usize, u8)>) -> u8 {
        let level = match previous {
            None => 1,
            Some((last_rank, last_level)) => match rank.cmp(&last_rank) {
                Ordering::Less => (rank + 1).min(u8::MAX as usize) as u8,
                Ordering::Greater => last_level.saturating_add(1),
                Ordering::Equal => last_level,
            },
        };
        level.min(self.config.max_level)
    }

    fn is_acceptable(&self, text: &str) -> bool {
        let length = text.chars().count();
        text.chars().next().is_some_and(char::is_alphanumeric)
            && length >= self.config.min_length
            && length <= self.config.max_length
    }
}
