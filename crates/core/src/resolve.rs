//! Place fixation intervals on their commit's row axis.

use tracing::{debug, warn};

use crate::model::{Commit, GazeSample, ResolvedGaze};

/// Resolve every interval against the commit page it was recorded on.
///
/// Intervals whose page or diff is not in `commits` are dropped. Split-view
/// lines missing from their diff's index map land on
/// [`ResolvedGaze::UNMAPPED_ROW`].
pub fn resolve_all(intervals: &[GazeSample], commits: &[Commit]) -> Vec<ResolvedGaze> {
    intervals
        .iter()
        .filter_map(|g| {
            let commit = commits.iter().find(|c| c.href == g.href);
            let resolved = commit.and_then(|c| resolve(g, c));
            if resolved.is_none() {
                debug!(
                    href = %g.href,
                    diff = %g.line.diff_index,
                    line = %g.line.id(),
                    "no diff for gaze interval"
                );
            }
            resolved
        })
        .collect()
}

/// Resolve one interval within `commit`. Returns `None` when the interval's
/// diff is not part of the commit.
pub fn resolve(gaze: &GazeSample, commit: &Commit) -> Option<ResolvedGaze> {
    let diff = commit.diff_for(&gaze.href, &gaze.line.diff_index)?;

    let row = match diff.diff_row(&gaze.line) {
        Some(row) => i64::from(row) + diff.offset as i64,
        None => {
            warn!(
                diff = %diff.id(),
                line = %gaze.line.id(),
                "line id missing from split index map"
            );
            ResolvedGaze::UNMAPPED_ROW
        }
    };

    Some(ResolvedGaze {
        sample: gaze.clone(),
        row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::diff::tests::line;
    use crate::model::gaze::tests::sample;
    use crate::model::{Diff, DiffIndex, LineType};

    const HREF: &str = "/pr/1/files";

    fn commit(split: bool) -> Commit {
        let first = vec![
            line(0, LineType::Unchanged, "0"),
            line(1, LineType::Deletion, "0"),
            line(1, LineType::Addition, "0"),
        ];
        let second = vec![
            line(0, LineType::Deletion, "1"),
            line(0, LineType::Addition, "1"),
            line(1, LineType::Unchanged, "1"),
        ];
        let diffs = [("0", first), ("1", second)]
            .into_iter()
            .map(|(i, lines)| {
                let d = Diff::new(HREF.into(), DiffIndex::new(i), None, lines);
                if split { d.with_split_index() } else { d }
            })
            .collect();
        Commit::new(HREF.into(), diffs)
    }

    fn gaze_on(index: u32, line_type: LineType, diff: &str) -> GazeSample {
        let mut g = sample(index, line_type, 0.0, 100.0);
        g.line.diff_index = DiffIndex::new(diff);
        g
    }

    #[test]
    fn unified_row_is_raw_index_plus_offset() {
        let c = commit(false);
        let r = resolve(&gaze_on(1, LineType::Addition, "0"), &c).unwrap();
        assert_eq!(r.row, 1);
        let r = resolve(&gaze_on(1, LineType::Unchanged, "1"), &c).unwrap();
        assert_eq!(r.row, 4 + 1);
    }

    #[test]
    fn split_row_goes_through_index_map() {
        let c = commit(true);
        let r = resolve(&gaze_on(1, LineType::Addition, "0"), &c).unwrap();
        assert_eq!(r.row, 2);
        let r = resolve(&gaze_on(1, LineType::Unchanged, "1"), &c).unwrap();
        assert_eq!(r.row, 4 + 2);
    }

    #[test]
    fn unmapped_split_line_gets_sentinel() {
        let c = commit(true);
        let r = resolve(&gaze_on(7, LineType::Unchanged, "1"), &c).unwrap();
        assert_eq!(r.row, ResolvedGaze::UNMAPPED_ROW);
    }

    #[test]
    fn unknown_diff_or_page_is_dropped() {
        let commits = vec![commit(false)];
        let mut other_page = gaze_on(0, LineType::Unchanged, "0");
        other_page.href = "/pr/9/files".into();
        let intervals = vec![
            gaze_on(0, LineType::Unchanged, "5"),
            other_page,
            gaze_on(0, LineType::Unchanged, "0"),
        ];
        let resolved = resolve_all(&intervals, &commits);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].row, 0);
    }
}
