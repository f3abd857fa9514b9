//! Region to fold-region conversion.

use crate::intervals::FoldRegion;
use crate::line_index::LineIndex;
use crate::regions::Region;

/// Convert regions to 0-based, inclusive line ranges.
///
/// A region whose end mark has only indentation before it on its line (a closing `BlockEnd`, or
/// a block scalar ending at the start of the next line) ends on the previous line. Regions that
/// would fold fewer than two lines are dropped. The result is sorted and free of duplicates.
pub fn fold_regions(regions: &[Region], line_index: &LineIndex) -> Vec<FoldRegion> {
    let mut folds: Vec<FoldRegion> = regions
        .iter()
        .filter_map(|region| {
            let start_line = region.start.line.saturating_sub(1);
            let mut end_line = region.end.line.saturating_sub(1);

            let (_, end_column) = line_index.char_offset_to_position(region.end.index);
            let before_end = line_index
                .get_line_text(end_line)
                .map(|text| text.chars().take(end_column).collect::<String>())
                .unwrap_or_default();
            if before_end.trim().is_empty() {
                end_line = end_line.saturating_sub(1);
            }

            (end_line > start_line).then(|| {
                FoldRegion::with_placeholder(start_line, end_line, region.collapsed_text.clone())
            })
        })
        .collect();

    folds.sort_by_key(|fold| (fold.start_line, fold.end_line));
    folds.dedup_by(|a, b| a.start_line == b.start_line && a.end_line == b.end_line);
    folds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::extract_regions;
    use yaml_editor_core_scanner::Scanner;

    fn folds_of(text: &str) -> Vec<(usize, usize)> {
        let regions = extract_regions(Scanner::new(text).filter_map(Result::ok));
        fold_regions(&regions, &LineIndex::from_text(text))
            .into_iter()
            .map(|fold| (fold.start_line, fold.end_line))
            .collect()
    }

    #[test]
    fn test_block_end_at_dedent_excludes_the_dedented_line() {
        let text = "a:\n  b:\n    - 1\n    - 2\n  c: 3\n";
        assert_eq!(folds_of(text), vec![(1, 4), (2, 3)]);
    }

    #[test]
    fn test_block_scalar_fold() {
        assert_eq!(folds_of("- |\n  hello\n  world\n- b\n"), vec![(0, 2)]);
    }

    #[test]
    fn test_multi_line_plain_scalar_keeps_its_last_line() {
        assert_eq!(folds_of("a: one\n  two\nb: 1\n"), vec![(0, 1)]);
    }

    #[test]
    fn test_two_line_block_that_folds_nothing_is_dropped() {
        // The nested mapping spans lines 2-3 but its region ends at the start of line 3.
        assert_eq!(folds_of("a:\n  b: 1\nc: 2\n"), Vec::<(usize, usize)>::new());
    }
}
