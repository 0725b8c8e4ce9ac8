use gaze_plot_protocol::ThemeToken;
use serde::{Deserialize, Serialize};

use crate::model::{Commit, LineType, ResolvedGaze, RowKind};

/// One point of the resampled gaze series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Milliseconds since the first fixation of the commit started.
    pub elapsed_ms: f64,
    pub row: i64,
}

/// Walks fixation intervals on a fixed sampling grid.
///
/// Instants inside an interval yield a point on that interval's row;
/// instants in a gap between intervals yield nothing. `intervals` must be
/// sorted by start.
#[derive(Debug, Clone)]
pub struct Resampler<'a> {
    intervals: &'a [ResolvedGaze],
    period: f64,
    origin: f64,
    span: f64,
    t: f64,
    i: usize,
}

impl<'a> Resampler<'a> {
    /// A non-positive `period_ms` yields an empty series.
    pub fn new(intervals: &'a [ResolvedGaze], period_ms: f64) -> Self {
        let origin = intervals.first().map_or(0.0, ResolvedGaze::start);
        let span = intervals.last().map_or(0.0, |g| g.end() - origin);
        let i = if period_ms > 0.0 { 0 } else { intervals.len() };
        Self {
            intervals,
            period: period_ms,
            origin,
            span,
            t: origin,
            i,
        }
    }

    /// Absolute timestamp that elapsed time is measured from.
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Last interval's end relative to the origin: the plot's time extent.
    pub fn span(&self) -> f64 {
        self.span
    }
}

impl Iterator for Resampler<'_> {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        while let Some(interval) = self.intervals.get(self.i) {
            let elapsed = self.t - self.origin;
            if elapsed > self.span {
                return None;
            }

            if interval.contains(self.t) {
                self.t += self.period;
                return Some(SamplePoint {
                    elapsed_ms: elapsed,
                    row: interval.row,
                });
            } else if self.t < interval.start() {
                self.t += self.period;
            } else {
                self.i += 1;
            }
        }
        None
    }
}

/// Fixed bar color for a row of the commit layout.
pub fn row_color(kind: RowKind<'_>) -> ThemeToken {
    match kind {
        RowKind::Separator => ThemeToken::DiffSeparator,
        RowKind::Line(LineType::Addition) => ThemeToken::LineAddition,
        RowKind::Line(LineType::Deletion) => ThemeToken::LineDeletion,
        RowKind::Line(LineType::Unchanged) => ThemeToken::LineUnchanged,
        RowKind::Line(LineType::Expandable) => ThemeToken::LineExpandable,
        RowKind::Line(LineType::Comment | LineType::Unknown(_)) => ThemeToken::LineUnknown,
    }
}

/// One bar color per commit row, top to bottom.
pub fn row_colors(commit: &Commit) -> Vec<ThemeToken> {
    commit.rows().map(row_color).collect()
}
