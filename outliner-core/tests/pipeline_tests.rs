//! Pipeline boundary tests over a small three-page report.
//!
//! `test_fixtures/layout_report.json` is a hand-built layout dump:
//!
//! - Page 1: two-line centred title, a numbered section, body text, a
//!   caption sitting above a three-row table, footer
//! - Page 2: two subsections, a boxed note, a paragraph on a filled panel
//! - Page 3: a second section with a subsection, a bold sub-subsection and
//!   a heading too short to keep
//!
//! Boundaries checked:
//!
//! - Supplier output: span count, rounding, body style, layout flags
//! - Title: merged lines, span indices
//! - Outline: exact headings, levels and pages
//! - Properties: first-level, no-skip, bounds, title exclusivity, fixed point

use outliner_core::*;
use std::path::{Path, PathBuf};

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

fn report_path() -> PathBuf {
    fixtures_dir().join("layout_report.json")
}

fn load_supply() -> SpanSupply {
    LayoutSupplier::default()
        .supply_file(&report_path())
        .unwrap_or_else(|e| panic!("Fixture {} did not load: {e}", report_path().display()))
}

fn processor() -> DocumentProcessor {
    DocumentProcessor::new(OutlineConfig::default())
}

fn find_span<'a>(supply: &'a SpanSupply, text: &str) -> &'a TextSpan {
    supply
        .spans
        .iter()
        .find(|s| s.text == text)
        .unwrap_or_else(|| panic!("span '{text}' missing from fixture"))
}

fn expected_outline() -> Vec<(u8, &'static str, u32)> {
    vec![
        (1, "1. Introduction and Goals", 0),
        (2, "Budget summary by program", 0),
        (2, "1.1 Scope of the Study", 1),
        (2, "1.2 Stakeholder Consultation", 1),
        (1, "2. Methodology Overview", 2),
        (2, "2.1 Data Collection", 2),
        (3, "Survey Instruments", 2),
    ]
}

// ============================================================================
// Boundary 1: Supplier output
// ============================================================================

mod supplier_boundary {
    use super::*;

    #[test]
    fn report_span_count_stable() {
        let supply = load_supply();
        assert_eq!(supply.spans.len(), 27, "Span count changed: supplier flattening drift?");
    }

    #[test]
    fn report_document_statistics() {
        let supply = load_supply();
        assert_eq!(supply.body_style, Style::new(11, "Times-Roman"));
        assert_eq!(supply.min_font_size, 8.0);
    }

    #[test]
    fn report_sizes_are_rounded() {
        let supply = load_supply();
        assert_eq!(find_span(&supply, "Strategy Report 2024").font_size, 24);
        assert_eq!(find_span(&supply, "1.2 Stakeholder Consultation").font_size, 13);
        assert_eq!(find_span(&supply, "2.1 Data Collection").font_size, 13);
    }

    #[test]
    fn report_table_cells_are_column_content() {
        let supply = load_supply();
        for cell in ["Operations", "Capital works", "Maintenance"] {
            assert!(find_span(&supply, cell).in_repeating_column, "{cell} should be column content");
        }
        assert!(!find_span(&supply, "Budget summary by program").in_repeating_column);
        assert!(!find_span(&supply, "1. Introduction and Goals").in_repeating_column);
    }

    #[test]
    fn report_only_unfilled_drawings_make_boxes() {
        let supply = load_supply();
        assert!(find_span(&supply, "Note: figures exclude federal grants.").in_bordered_box);

        let panel = supply
            .spans
            .iter()
            .find(|s| s.text.starts_with("Consultation sessions"))
            .expect("panel paragraph");
        assert!(!panel.in_bordered_box);
    }

    #[test]
    fn report_pages_are_zero_based() {
        let supply = load_supply();
        assert_eq!(find_span(&supply, "Regional Transit").page_index, 0);
        assert_eq!(find_span(&supply, "Q&A").page_index, 2);
    }
}

// ============================================================================
// Boundary 2: Title
// ============================================================================

mod title_boundary {
    use super::*;

    #[test]
    fn report_title_merges_both_lines() {
        let stages = processor().process_capture_stages(&report_path()).unwrap();
        assert_eq!(stages.inference.outline.title, "Regional Transit Strategy Report 2024");

        let title = stages.inference.title.expect("title detected");
        assert_eq!(title.span_indices, vec![0, 1]);
    }
}

// ============================================================================
// Boundary 3: Outline
// ============================================================================

mod outline_boundary {
    use super::*;

    #[test]
    fn report_outline_exact() {
        let outline = processor().process_file(&report_path()).unwrap();
        let actual: Vec<(u8, &str, u32)> = outline
            .outline
            .iter()
            .map(|h| (h.level, h.text.as_str(), h.page))
            .collect();
        assert_eq!(actual, expected_outline());
    }

    #[test]
    fn report_rejected_candidates_are_visible_in_stages() {
        let stages = processor().process_capture_stages(&report_path()).unwrap();
        let texts: Vec<&str> = stages.inference.candidates.iter().map(|s| s.text.as_str()).collect();

        // the line above the boxed note qualifies but is too long to be a heading
        assert!(texts.iter().any(|t| t.starts_with("and the connecting services")));
        assert!(texts.contains(&"Q&A"));
        assert_eq!(stages.inference.candidates.len(), 9);
        assert_eq!(stages.inference.provisional.len(), 7);
    }

    #[test]
    fn report_validation_is_clean() {
        let stages = processor().process_capture_stages(&report_path()).unwrap();
        let report = stages.inference.validation.expect("validation enabled by default");
        assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
        assert_eq!(report.total_headings, 7);
    }

    #[test]
    fn report_outline_json_shape() {
        let outline = processor().process_file(&report_path()).unwrap();
        let json = serde_json::to_value(&outline).unwrap();
        assert_eq!(json["title"], "Regional Transit Strategy Report 2024");
        assert_eq!(json["outline"][0]["level"], "H1");
        assert_eq!(json["outline"][6]["level"], "H3");
        assert_eq!(json["outline"][6]["page"], 2);
        assert!(json["outline"][0].get("style").is_none());
    }

    #[test]
    fn stages_serialize_flat() {
        let stages = processor().process_capture_stages(&report_path()).unwrap();
        let json = serde_json::to_value(&stages).unwrap();
        assert!(json["supply"]["spans"].is_array());
        assert!(json["candidates"].is_array());
        assert!(json["outline"]["outline"].is_array());
    }
}

// ============================================================================
// Properties
// ============================================================================

mod properties {
    use super::*;

    fn report_outline() -> DocumentOutline {
        processor().process_file(&report_path()).unwrap()
    }

    #[test]
    fn first_heading_is_h1() {
        assert_eq!(report_outline().outline[0].level, 1);
    }

    #[test]
    fn levels_never_skip() {
        let outline = report_outline();
        let mut max_seen = 0;
        for heading in &outline.outline {
            assert!(heading.level <= max_seen + 1, "'{}' skips a level", heading.text);
            max_seen = max_seen.max(heading.level);
        }
    }

    #[test]
    fn text_bounds_hold() {
        let outline = report_outline();
        for heading in &outline.outline {
            let length = heading.text.chars().count();
            assert!((7..=87).contains(&length), "'{}' has {length} chars", heading.text);
        }
        assert!(outline.title.chars().count() <= 200);
        assert!(outline.title.split_whitespace().count() >= 2);
    }

    #[test]
    fn title_spans_are_not_headings() {
        let stages = processor().process_capture_stages(&report_path()).unwrap();
        let title = stages.inference.title.expect("title detected");
        for index in title.span_indices {
            let text = &stages.supply.spans[index].text;
            assert!(
                stages.inference.outline.outline.iter().all(|h| !h.text.contains(text.as_str())),
                "title span '{text}' reused as heading"
            );
        }
    }

    #[test]
    fn fixing_again_changes_nothing() {
        let stages = processor().process_capture_stages(&report_path()).unwrap();
        let mut again = stages.inference.fixed.clone();
        fix_hierarchy(&mut again);
        assert_eq!(again, stages.inference.fixed);
    }
}

// ============================================================================
// Batch processing
// ============================================================================

mod batch {
    use super::*;

    fn copy_fixture(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::copy(report_path(), &path).unwrap();
        path
    }

    #[test]
    fn malformed_document_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        copy_fixture(dir.path(), "a_report.json");
        std::fs::write(dir.path().join("b_broken.json"), "{ \"pages\": [ {").unwrap();
        copy_fixture(dir.path(), "c_report.json");
        std::fs::write(dir.path().join("notes.txt"), "not a layout dump").unwrap();

        let processor = processor();
        let inputs = processor.collect_inputs(dir.path()).unwrap();
        assert_eq!(inputs.len(), 3);

        let items = processor.process_batch(&inputs);
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(!items[1].is_ok());
        assert!(items[2].is_ok());
        assert!(items[1].path.ends_with("b_broken.json"));

        let first = items[0].result.as_ref().unwrap();
        assert_eq!(first.outline.len(), expected_outline().len());
    }

    #[test]
    fn saved_outline_reloads_and_refines_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let outline = processor().process_file(&report_path()).unwrap();
        let path = dir.path().join("layout_report.json");
        outline.save_to_json(&path).unwrap();

        let loaded = DocumentOutline::load_from_json(&path).unwrap();
        assert_eq!(loaded, outline);
        assert_eq!(loaded.refined(), outline);
    }
}
