use crate::config::CandidateConfig;
use crate::types::*;

// CandidateFilterRule - keeps spans that look like section headings
pub struct CandidateFilterRule<'a> {
    config: &'a CandidateConfig,
}

impl<'a> CandidateFilterRule<'a> {
    pub fn new(config: &'a CandidateConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        "CandidateFilter"
    }

    /// Filter the non-title spans down to heading candidates, keeping document order.
    pub fn select<'s>(&self, spans: &[&'s TextSpan], ctx: DocumentContext<'_>) -> Vec<&'s TextSpan> {
        let body_is_bold = self.config.is_bold(&ctx.body_style.font_name);

        spans
            .iter()
            .enumerate()
            .filter(|&(index, span)| {
                if self.is_excluded(span, ctx) {
                    return false;
                }
                let is_larger = span.font_size > ctx.body_style.font_size;
                let is_bolder = self.config.is_bold(&span.font_name) && !body_is_bold;
                // a plain span directly above a table or boxed figure introduces it
                let is_above_layout = spans
                    .get(index + 1)
                    .is_some_and(|next| next.is_layout_noise() && !span.is_layout_noise());

                is_larger || is_bolder || is_above_layout
            })
            .map(|(_, span)| *span)
            .collect()
    }

    fn is_excluded(&self, span: &TextSpan, ctx: DocumentContext<'_>) -> bool {
        span.is_layout_noise()
            || span.font_size as f32 <= ctx.min_font_size
            || span.word_count() > self.config.max_words
    }
}
