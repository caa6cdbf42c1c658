use crate::config::TitleConfig;
use crate::types::*;
use serde::Serialize;

/// Spans chosen as the document title, in top-to-bottom order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleMatch {
    /// Indices into the document span list
    pub span_indices: Vec<usize>,
    pub text: String,
}

/// Geometry of the title page, derived from the extents of its spans.
#[derive(Debug, Clone, Copy)]
struct PageFrame {
    width: f32,
    vertical_cutoff: f32,
}

impl PageFrame {
    fn center_x(&self) -> f32 {
        self.width / 2.0
    }
}

// TitleDetectionRule - finds the centred, rarely-styled block near the top of the first page
pub struct TitleDetectionRule<'a> {
    config: &'a TitleConfig,
}

impl<'a> TitleDetectionRule<'a> {
    pub fn new(config: &'a TitleConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        "TitleDetection"
    }

    /// Scan title-page candidates top to bottom and return the first group that
    /// passes every check, or `None`.
    pub fn detect(&self, spans: &[TextSpan], ctx: DocumentContext<'_>) -> Option<TitleMatch> {
        let mut page: Vec<usize> = spans
            .iter()
            .enumerate()
            .filter(|(_, span)| span.page_index == self.config.page_index && !span.text.trim().is_empty())
            .map(|(index, _)| index)
            .collect();
        page.sort_by(|&a, &b| spans[a].bbox.y0.total_cmp(&spans[b].bbox.y0));

        let last_on_page = *page.last()?;

        let height = page.iter().map(|&i| spans[i].bbox.y1).fold(f32::NEG_INFINITY, f32::max);
        let width = page.iter().map(|&i| spans[i].bbox.x1).fold(f32::NEG_INFINITY, f32::max);
        let frame = PageFrame {
            width,
            vertical_cutoff: height * self.config.vertical_cutoff_ratio,
        };

        let candidates: Vec<usize> = page
            .into_iter()
            .filter(|&i| {
                let span = &spans[i];
                span.bbox.y0 < frame.vertical_cutoff
                    && span.font_size as f32 > ctx.min_font_size
                    && !span.is_layout_noise()
            })
            .collect();

        log::debug!(
            "title page: width {:.1}, cutoff {:.1}, {} candidates",
            frame.width,
            frame.vertical_cutoff,
            candidates.len()
        );

        let mut cursor = 0;
        while cursor < candidates.len() {
            if let Some(group) = self.grow_group(spans, &candidates, cursor) {
                if let Some(title) = self.accept_group(spans, group, last_on_page, frame) {
                    return Some(title);
                }
            }
            cursor += 1;
        }
        None
    }

    /// Merge forward from `candidates[start]` while lines share its style and
    /// stay vertically close. `None` when the style is too common to be a title.
    fn grow_group(&self, spans: &[TextSpan], candidates: &[usize], start: usize) -> Option<Vec<usize>> {
        let first = &spans[candidates[start]];
        let style = first.style();

        let repeats = candidates.iter().filter(|&&i| spans[i].has_style(&style)).count();
        if repeats > self.config.max_style_repeats {
            log::debug!("title start '{}' skipped: style {} used {} times", first.text, style, repeats);
            return None;
        }

        let mut group = vec![candidates[start]];
        let mut last = first;
        for &index in &candidates[start + 1..] {
            let span = &spans[index];
            let gap = span.bbox.y0 - last.bbox.y1;
            let is_close = gap >= 0.0 && gap < last.font_size as f32 * self.config.merge_gap_factor;

            if span.has_style(&style) && is_close {
                group.push(index);
                last = span;
            } else if gap > 0.0 && !is_close {
                break;
            }
        }
        Some(group)
    }

    fn accept_group(
        &self,
        spans: &[TextSpan],
        group: Vec<usize>,
        last_on_page: usize,
        frame: PageFrame,
    ) -> Option<TitleMatch> {
        if group.last() == Some(&last_on_page) {
            log::debug!("title group rejected: ends the page");
            return None;
        }

        let x0 = group.iter().map(|&i| spans[i].bbox.x0).fold(f32::INFINITY, f32::min);
        let x1 = group.iter().map(|&i| spans[i].bbox.x1).fold(f32::NEG_INFINITY, f32::max);
        let center = x0 + (x1 - x0) / 2.0;
        if (center - frame.center_x()).abs() > frame.width * self.config.center_tolerance_ratio {
            log::debug!("title group rejected: centre {:.1} vs page centre {:.1}", center, frame.center_x());
            return None;
        }

        let text = group
            .iter()
            .map(|&i| spans[i].text.trim())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        let starts_alphanumeric = text.chars().next().is_some_and(char::is_alphanumeric);
        let is_multi_word = text.split_whitespace().count() > 1;
        let fits = text.chars().count() <= self.config.max_length;

        if starts_alphanumeric && is_multi_word && fits {
            log::debug!("title accepted: '{}'", text);
            Some(TitleMatch {
                span_indices: group,
                text,
            })
        } else {
            log::debug!("title group rejected: text '{}'", text);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE_FONT: &str = "Helvetica-Bold";

    fn span(bbox: [f32; 4], text: &str, size: u32, font: &str) -> TextSpan {
        TextSpan {
            bbox: bbox.into(),
            text: text.to_string(),
            font_size: size,
            font_name: font.to_string(),
            page_index: 0,
            in_repeating_column: false,
            in_bordered_box: false,
        }
    }

    fn detect(spans: &[TextSpan]) -> Option<TitleMatch> {
        let config = TitleConfig::default();
        let body = Style::new(10, "Times-Roman");
        let ctx = DocumentContext {
            body_style: &body,
            min_font_size: 8.0,
        };
        TitleDetectionRule::new(&config).detect(spans, ctx)
    }

    /// Page 600 wide, 800 tall: two centred title lines, a left-aligned byline,
    /// body text below the cutoff and a footer closing the page.
    fn title_page() -> Vec<TextSpan> {
        vec![
            span([200.0, 100.0, 400.0, 124.0], "Annual Report on", 24, TITLE_FONT),
            span([180.0, 130.0, 420.0, 154.0], "Regional Rail Planning", 24, TITLE_FONT),
            span([50.0, 200.0, 250.0, 214.0], "Prepared for the Board", 14, "Helvetica"),
            span([50.0, 500.0, 550.0, 510.0], "Body text sits well below the title cutoff line.", 10, "Times-Roman"),
            span([280.0, 780.0, 600.0, 800.0], "Page 1", 10, "Times-Roman"),
        ]
    }

    #[test]
    fn test_centred_two_line_title_is_merged() {
        let title = detect(&title_page()).expect("title");
        assert_eq!(title.text, "Annual Report on Regional Rail Planning");
        assert_eq!(title.span_indices, vec![0, 1]);
    }

    #[test]
    fn test_title_style_used_four_times_is_rejected() {
        let mut spans = title_page();
        spans.push(span([200.0, 300.0, 400.0, 324.0], "Another Big Line", 24, TITLE_FONT));
        spans.push(span([200.0, 400.0, 400.0, 424.0], "Yet Another Line", 24, TITLE_FONT));
        assert_eq!(detect(&spans), None);
    }

    #[test]
    fn test_style_used_three_times_is_still_a_title() {
        let mut spans = title_page();
        spans.push(span([200.0, 300.0, 400.0, 324.0], "Third Big Line", 24, TITLE_FONT));
        let title = detect(&spans).expect("title");
        assert_eq!(title.text, "Annual Report on Regional Rail Planning");
    }

    #[test]
    fn test_side_by_side_span_does_not_break_merge() {
        let spans = vec![
            span([200.0, 100.0, 400.0, 124.0], "Annual Report on", 24, TITLE_FONT),
            // edition label on the first title line, different style
            span([480.0, 104.0, 580.0, 116.0], "Draft edition", 10, "Helvetica-Oblique"),
            span([180.0, 130.0, 420.0, 154.0], "Regional Rail Planning", 24, TITLE_FONT),
            span([50.0, 780.0, 600.0, 800.0], "Page 1", 10, "Times-Roman"),
        ];
        let title = detect(&spans).expect("title");
        assert_eq!(title.span_indices, vec![0, 2]);
        assert_eq!(title.text, "Annual Report on Regional Rail Planning");
    }

    #[test]
    fn test_group_ending_the_page_is_rejected() {
        // tall boxed sidebar sets the page height but is never a candidate
        let mut sidebar = span([50.0, 20.0, 550.0, 300.0], "Boxed sidebar text", 10, "Times-Roman");
        sidebar.in_bordered_box = true;
        let mut spans = vec![
            sidebar,
            span([200.0, 100.0, 400.0, 124.0], "Lonely Title Line", 24, TITLE_FONT),
        ];
        assert_eq!(detect(&spans), None);

        spans.push(span([50.0, 250.0, 550.0, 260.0], "Closing line", 10, "Times-Roman"));
        let title = detect(&spans).expect("title");
        assert_eq!(title.text, "Lonely Title Line");
    }

    #[test]
    fn test_off_centre_group_is_skipped_for_next_start() {
        let spans = vec![
            span([20.0, 50.0, 200.0, 70.0], "Left Aligned Banner", 20, "Arial"),
            span([200.0, 100.0, 400.0, 124.0], "Centred Real Title", 24, TITLE_FONT),
            span([50.0, 600.0, 600.0, 800.0], "Footer", 10, "Times-Roman"),
        ];
        let title = detect(&spans).expect("title");
        assert_eq!(title.text, "Centred Real Title");
    }

    #[test]
    fn test_single_word_title_is_rejected() {
        let spans = vec![
            span([250.0, 100.0, 350.0, 124.0], "Contents", 24, TITLE_FONT),
            span([50.0, 600.0, 600.0, 800.0], "Footer", 10, "Times-Roman"),
        ];
        assert_eq!(detect(&spans), None);
    }

    #[test]
    fn test_far_gap_stops_merging() {
        let spans = vec![
            span([200.0, 100.0, 400.0, 124.0], "Strategy Report", 24, TITLE_FONT),
            // 80pt gap > 1.8 * 24
            span([200.0, 204.0, 400.0, 228.0], "Second Block", 24, TITLE_FONT),
            span([50.0, 600.0, 600.0, 800.0], "Footer", 10, "Times-Roman"),
        ];
        let title = detect(&spans).expect("title");
        assert_eq!(title.span_indices, vec![0]);
    }

    #[test]
    fn test_spans_below_cutoff_or_noise_are_ignored() {
        let mut spans = title_page();
        spans[0].in_bordered_box = true;
        let title = detect(&spans).expect("title");
        assert_eq!(title.text, "Regional Rail Planning");

        let spans = vec![
            span([200.0, 700.0, 400.0, 724.0], "Late Title Text", 24, TITLE_FONT),
            span([50.0, 780.0, 600.0, 800.0], "Footer", 10, "Times-Roman"),
        ];
        assert_eq!(detect(&spans), None);
    }

    #[test]
    fn test_no_first_page_spans() {
        let mut spans = title_page();
        for span in &mut spans {
            span.page_index = 1;
        }
        assert_eq!(detect(&spans), None);
        assert_eq!(detect(&[]), None);
    }
}
