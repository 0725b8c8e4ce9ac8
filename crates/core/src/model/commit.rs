use super::diff::{Diff, DiffIndex, diff_id};
use super::line::LineType;

/// What occupies one row of a commit's vertical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind<'a> {
    Line(&'a LineType),
    /// The blank row between two consecutive diffs.
    Separator,
}

/// All diffs of one commit page laid out on a single vertical axis.
#[derive(Debug, Clone)]
pub struct Commit {
    pub href: String,
    diffs: Vec<Diff>,
}

impl Commit {
    /// Sort `diffs` by numeric diff index and assign each its row offset:
    /// the rows of every earlier diff plus one separator row per diff.
    pub fn new(href: String, mut diffs: Vec<Diff>) -> Self {
        diffs.sort_by(|a, b| a.index.cmp(&b.index));

        let mut total = 0;
        for diff in &mut diffs {
            diff.offset = total;
            total += diff.row_count() + 1;
        }

        Self { href, diffs }
    }

    pub fn diffs(&self) -> &[Diff] {
        &self.diffs
    }

    /// Look up a diff by its composite id (`"{href}-{diff_index}"`).
    pub fn diff(&self, id: &str) -> Option<&Diff> {
        self.diffs.iter().find(|d| d.id() == id)
    }

    /// Look up the diff a gaze on `href` with `diff_index` refers to.
    pub fn diff_for(&self, href: &str, diff_index: &DiffIndex) -> Option<&Diff> {
        self.diff(&diff_id(href, diff_index))
    }

    /// Diff lines plus the separators between diffs (none after the last).
    pub fn row_count(&self) -> usize {
        let lines: usize = self.diffs.iter().map(Diff::row_count).sum();
        lines + self.diffs.len().saturating_sub(1)
    }

    /// Every row of the layout, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = RowKind<'_>> {
        let last = self.diffs.len().saturating_sub(1);
        self.diffs.iter().enumerate().flat_map(move |(i, diff)| {
            let separator = (i < last).then_some(RowKind::Separator);
            diff.lines
                .iter()
                .map(|l| RowKind::Line(l.line_type()))
                .chain(separator)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::diff::tests::line;
    use crate::model::Line;

    fn diff(index: &str, n: u32) -> Diff {
        let lines: Vec<Line> = (0..n).map(|i| line(i, LineType::Unchanged, index)).collect();
        Diff::new("/pr/1".into(), DiffIndex::new(index), None, lines)
    }

    #[test]
    fn sorts_numerically_and_assigns_offsets() {
        let commit = Commit::new(
            "/pr/1".into(),
            vec![diff("10", 2), diff("2", 4), diff("0", 3)],
        );
        let order: Vec<&str> = commit.diffs().iter().map(|d| d.index.as_str()).collect();
        assert_eq!(order, ["0", "2", "10"]);

        let offsets: Vec<usize> = commit.diffs().iter().map(|d| d.offset).collect();
        assert_eq!(offsets, [0, 4, 9]);
        assert_eq!(commit.row_count(), 3 + 4 + 2 + 2);
    }

    #[test]
    fn offsets_are_contiguous_with_one_separator() {
        let commit = Commit::new(
            "/pr/1".into(),
            vec![diff("3", 1), diff("1", 7), diff("2", 0), diff("0", 5)],
        );
        for pair in commit.diffs().windows(2) {
            assert!(pair[0].offset < pair[1].offset);
            assert_eq!(pair[0].offset + pair[0].row_count() + 1, pair[1].offset);
        }
    }

    #[test]
    fn rows_match_row_count() {
        let commit = Commit::new("/pr/1".into(), vec![diff("0", 2), diff("1", 1)]);
        let rows: Vec<RowKind<'_>> = commit.rows().collect();
        assert_eq!(rows.len(), commit.row_count());
        assert_eq!(rows[2], RowKind::Separator);
        assert!(matches!(rows.last(), Some(RowKind::Line(_))));
    }

    #[test]
    fn empty_commit_has_no_rows() {
        let commit = Commit::new("/pr/1".into(), Vec::new());
        assert_eq!(commit.row_count(), 0);
        assert_eq!(commit.rows().count(), 0);
    }

    #[test]
    fn finds_diff_by_composite_id() {
        let commit = Commit::new("/pr/1".into(), vec![diff("0", 2), diff("1", 1)]);
        assert!(commit.diff("/pr/1-1").is_some());
        assert!(commit.diff_for("/pr/1", &DiffIndex::new("0")).is_some());
        assert!(commit.diff("/pr/2-0").is_none());
    }
}
