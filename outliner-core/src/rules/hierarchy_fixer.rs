use crate::types::*;

/// Rewrite heading levels in place so the outline starts at H1, never skips a
/// level going deeper, and no heading is visually larger than its presumed parent.
///
/// Three passes: sequential clamp, font-size consistency, sequential clamp again
/// (promotions in the second pass can reopen gaps).
pub fn fix_hierarchy(headings: &mut [WorkingHeading]) {
    if headings.is_empty() {
        return;
    }

    clamp_sequence(headings);
    let promoted = promote_by_font_size(headings);
    clamp_sequence(headings);

    log::debug!("hierarchy fixer: {} headings, {} promoted by font size", headings.len(), promoted);
}

/// Re-fix a stored outline. Styles are unknown for stored headings, so only the
/// clamp passes can change anything.
pub fn refine_outline(outline: Vec<Heading>) -> Vec<Heading> {
    let mut working: Vec<WorkingHeading> = outline.into_iter().map(WorkingHeading::from).collect();
    fix_hierarchy(&mut working);
    working.into_iter().map(WorkingHeading::into_heading).collect()
}

fn clamp_sequence(headings: &mut [WorkingHeading]) {
    let mut max_level_seen: u8 = 0;
    for (i, heading) in headings.iter_mut().enumerate() {
        let mut level = heading.level;
        if i == 0 && level > 1 {
            level = 1;
        }
        let ceiling = max_level_seen.saturating_add(1);
        if level > ceiling {
            level = ceiling;
        }
        heading.level = level;
        max_level_seen = level;
    }
}

fn promote_by_font_size(headings: &mut [WorkingHeading]) -> usize {
    let mut last_h1_size: Option<u32> = None;
    let mut last_h2_size: Option<u32> = None;
    let mut promoted = 0;

    for heading in headings.iter_mut() {
        let size = heading.font_size();
        match heading.level {
            1 => {
                last_h1_size = Some(size);
                last_h2_size = None;
            }
            2 => {
                if last_h1_size.is_some_and(|h1| size > h1) {
                    heading.level = 1;
                    last_h1_size = Some(size);
                    last_h2_size = None;
                    promoted += 1;
                } else {
                    last_h2_size = Some(size);
                }
            }
            3 => {
                if last_h2_size.is_some_and(|h2| size > h2) {
                    heading.level = 2;
                    last_h2_size = Some(size);
                    promoted += 1;
                } else if last_h1_size.is_some_and(|h1| size > h1) {
                    heading.level = 1;
                    last_h1_size = Some(size);
                    last_h2_size = None;
                    promoted += 1;
                }
            }
            _ => {}
        }
    }
    promoted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, size: u32) -> WorkingHeading {
        WorkingHeading {
            level,
            text: format!("Heading at {size}pt"),
            page: 0,
            style: Some(Style::new(size, "Arial-Bold")),
        }
    }

    fn fixed_levels(input: &[(u8, u32)]) -> Vec<u8> {
        let mut headings: Vec<WorkingHeading> = input.iter().map(|&(l, s)| heading(l, s)).collect();
        fix_hierarchy(&mut headings);
        headings.iter().map(|h| h.level).collect()
    }

    #[test]
    fn test_h2_larger_than_h1_is_promoted() {
        assert_eq!(fixed_levels(&[(1, 16), (2, 18)]), vec![1, 1]);
    }

    #[test]
    fn test_jump_from_h1_to_h3_is_clamped() {
        assert_eq!(fixed_levels(&[(1, 20), (3, 14)]), vec![1, 2]);
    }

    #[test]
    fn test_outline_starting_at_h2_starts_at_h1() {
        assert_eq!(fixed_levels(&[(2, 16), (2, 16)]), vec![1, 2]);
        assert_eq!(fixed_levels(&[(3, 12)]), vec![1]);
    }

    #[test]
    fn test_empty_input_is_untouched() {
        let mut headings: Vec<WorkingHeading> = Vec::new();
        fix_hierarchy(&mut headings);
        assert!(headings.is_empty());
    }

    #[test]
    fn test_h3_promoted_past_smaller_h2() {
        assert_eq!(fixed_levels(&[(1, 20), (2, 12), (3, 14)]), vec![1, 2, 2]);
    }

    #[test]
    fn test_h3_promoted_to_h1_without_h2_context() {
        // promoting the 25pt H2 resets the H2 context
        assert_eq!(fixed_levels(&[(1, 20), (2, 25), (3, 30)]), vec![1, 1, 1]);
        // an unpromoted H3 is then two below its H1 and gets clamped
        assert_eq!(fixed_levels(&[(1, 20), (2, 25), (3, 12)]), vec![1, 1, 2]);
    }

    #[test]
    fn test_comparison_uses_last_h1_not_largest() {
        // the second H2 is smaller than the first H1 but larger than the most recent one
        assert_eq!(fixed_levels(&[(1, 20), (2, 14), (1, 12), (2, 16)]), vec![1, 2, 1, 1]);
    }

    #[test]
    fn test_clamp_uses_previous_level_not_running_max() {
        assert_eq!(fixed_levels(&[(1, 20), (2, 16), (3, 12), (1, 20), (3, 12)]), vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_typical_outline_is_a_fixed_point() {
        let input = [(1, 18), (2, 14), (3, 12), (2, 14), (1, 18), (2, 14), (3, 12)];
        let mut headings: Vec<WorkingHeading> = input.iter().map(|&(l, s)| heading(l, s)).collect();
        fix_hierarchy(&mut headings);
        let once = headings.clone();
        fix_hierarchy(&mut headings);
        assert_eq!(headings, once);
    }

    #[test]
    fn test_second_run_can_promote_again() {
        // after the first run the 12pt heading is an H2 that outranks the 10pt H1
        let mut headings = vec![heading(1, 10), heading(2, 8), heading(3, 12)];
        fix_hierarchy(&mut headings);
        assert_eq!(headings.iter().map(|h| h.level).collect::<Vec<_>>(), vec![1, 2, 2]);
        fix_hierarchy(&mut headings);
        assert_eq!(headings.iter().map(|h| h.level).collect::<Vec<_>>(), vec![1, 2, 1]);
    }

    #[test]
    fn test_missing_styles_only_clamp() {
        let mut headings = vec![heading(1, 10), heading(2, 30)];
        headings[1].style = None;
        headings.push(WorkingHeading {
            level: 3,
            text: "Unstyled deep heading".to_string(),
            page: 1,
            style: None,
        });
        fix_hierarchy(&mut headings);
        assert_eq!(headings.iter().map(|h| h.level).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_refine_stored_outline() {
        let outline = vec![
            Heading {
                level: 3,
                text: "Executive Summary".to_string(),
                page: 0,
            },
            Heading {
                level: 3,
                text: "Key Findings".to_string(),
                page: 1,
            },
            Heading {
                level: 0,
                text: "Unlabelled heading".to_string(),
                page: 2,
            },
        ];
        let refined = refine_outline(outline);
        assert_eq!(refined.iter().map(|h| h.level).collect::<Vec<_>>(), vec![1, 2, 0]);
        assert_eq!(refined[1].text, "Key Findings");
    }

    #[test]
    fn test_refine_deepest_stored_labels_do_not_overflow() {
        let mut outline: Vec<Heading> = (1..=u8::MAX)
            .map(|level| Heading {
                level,
                text: format!("Nested heading {level}"),
                page: 0,
            })
            .collect();
        outline.push(Heading {
            level: 1,
            text: "Back to the top".to_string(),
            page: 1,
        });

        let refined = refine_outline(outline);
        assert_eq!(refined.len(), 256);
        assert_eq!(refined[254].level, u8::MAX);
        assert_eq!(refined[255].level, 1);
    }
}
