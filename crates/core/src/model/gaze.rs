use serde::{Deserialize, Serialize};

use super::line::LineRef;

/// One eye-tracking sample that landed on a diff line.
///
/// Timestamps are milliseconds on the logger's clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    pub target: Option<String>,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub href: String,
    pub domain: Option<String>,
    pub page_type: Option<String>,
    pub line: LineRef,
}

impl GazeSample {
    /// Whether `next` continues the same fixation: same line of the same
    /// file on the same page, starting less than `merge_ms` away from the
    /// current end.
    pub fn continues_with(&self, next: &GazeSample, merge_ms: f64) -> bool {
        self.line.line_type == next.line.line_type
            && self.line.file == next.line.file
            && self.line.index == next.line.index
            && self.href == next.href
            && (self.end - next.start).abs() < merge_ms
    }

    /// Extend this sample to cover `next` as well.
    pub fn absorb(&mut self, next: &GazeSample) {
        self.end = next.end;
        self.duration = self.end - self.start;
    }
}

/// A fixation interval placed on its commit's row axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGaze {
    #[serde(flatten)]
    pub sample: GazeSample,
    /// Commit-relative row, or [`ResolvedGaze::UNMAPPED_ROW`].
    pub row: i64,
}

impl ResolvedGaze {
    /// Row used when a split-view line id is missing from its diff's map.
    pub const UNMAPPED_ROW: i64 = -1;

    pub fn start(&self) -> f64 {
        self.sample.start
    }

    pub fn end(&self) -> f64 {
        self.sample.end
    }

    pub fn contains(&self, t: f64) -> bool {
        self.sample.start <= t && t < self.sample.end
    }
}
