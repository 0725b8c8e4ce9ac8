use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::line::{Line, LineId, LineRef, LineType};

/// Position of a diff within its commit page. Logged as a string-encoded
/// small integer, so ordering compares the numeric value first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffIndex(String);

impl DiffIndex {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn numeric(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl Ord for DiffIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for DiffIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DiffIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite diff identifier: `"{href}-{diff_index}"`.
pub fn diff_id(href: &str, index: &DiffIndex) -> String {
    format!("{href}-{index}")
}

/// One file's change set within a commit page.
#[derive(Debug, Clone)]
pub struct Diff {
    pub href: String,
    pub index: DiffIndex,
    pub file: Option<String>,
    /// Lines in rendered order.
    pub lines: Vec<Line>,
    /// First commit row occupied by this diff. Assigned by `Commit::new`.
    pub offset: usize,
    /// Split-view line id → unified row. Only present in split mode.
    index_map: Option<HashMap<LineId, u32>>,
}

impl Diff {
    pub fn new(href: String, index: DiffIndex, file: Option<String>, lines: Vec<Line>) -> Self {
        Self {
            href,
            index,
            file,
            lines,
            offset: 0,
            index_map: None,
        }
    }

    pub fn id(&self) -> String {
        diff_id(&self.href, &self.index)
    }

    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    /// Build the split-view index map for this diff.
    pub fn with_split_index(mut self) -> Self {
        self.index_map = Some(split_index_map(&self.lines));
        self
    }

    pub fn index_map(&self) -> Option<&HashMap<LineId, u32>> {
        self.index_map.as_ref()
    }

    /// Diff-relative row of the line `key` refers to.
    ///
    /// With a split index map the line id is looked up and `None` means the
    /// id is unknown to this diff. Without one the raw index is the row.
    pub fn diff_row(&self, key: &LineRef) -> Option<u32> {
        match &self.index_map {
            Some(map) => map.get(&key.id()).copied(),
            None => Some(key.index),
        }
    }
}

/// Map each line of a split-view diff to its row in the unified layout.
///
/// Split view renders a deletion and the addition replacing it side by side
/// under the same raw index; the unified layout needs them on two rows, so
/// every such pair pushes all later lines down by one.
pub fn split_index_map(lines: &[Line]) -> HashMap<LineId, u32> {
    let mut map = HashMap::with_capacity(lines.len());
    let mut offset = 0;

    for (i, line) in lines.iter().enumerate() {
        map.insert(line.id(), line.index() + offset);

        if let Some(next) = lines.get(i + 1)
            && *line.line_type() == LineType::Deletion
            && *next.line_type() == LineType::Addition
            && line.index() == next.index()
        {
            offset += 1;
        }
    }

    map
}
