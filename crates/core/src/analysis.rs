//! Per-commit orchestration of the gaze pipeline.

use gaze_plot_protocol::ThemeToken;
use thiserror::Error;
use tracing::{debug, warn};

use crate::coalesce::fixations;
use crate::config::PipelineConfig;
use crate::model::{Commit, ResolvedGaze, RowKind};
use crate::parsers::GazeLog;
use crate::resolve::resolve_all;
use crate::views::timeline::{Resampler, SamplePoint, row_colors};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlotError {
    #[error("no gaze intervals left for {href}")]
    EmptyCommitGazeSet { href: String },
}

/// Everything needed to draw one commit's figure.
#[derive(Debug, Clone)]
pub struct CommitPlot {
    pub href: String,
    /// Absolute timestamp of the first fixation.
    pub origin_ms: f64,
    /// Elapsed time from `origin_ms` to the end of the last fixation.
    pub span_ms: f64,
    pub points: Vec<SamplePoint>,
    /// One bar color per commit row, top to bottom.
    pub row_colors: Vec<ThemeToken>,
    /// Line type of each row (`"separator"` between diffs).
    pub row_kinds: Vec<String>,
    /// The fixation intervals the points were sampled from.
    pub intervals: Vec<ResolvedGaze>,
}

impl CommitPlot {
    pub fn row_count(&self) -> usize {
        self.row_colors.len()
    }
}

/// Coalesce the log's samples and place them on their commits' rows.
///
/// The result is sorted by start timestamp.
pub fn resolve_log(log: &GazeLog, config: &PipelineConfig) -> Vec<ResolvedGaze> {
    let intervals = fixations(&log.samples, config);
    resolve_all(&intervals, &log.commits)
}

/// Resample the intervals recorded on `commit` into a plottable series.
///
/// `resolved` may hold intervals of other commits; only those on
/// `commit.href` are used.
pub fn plot_commit(
    commit: &Commit,
    resolved: &[ResolvedGaze],
    config: &PipelineConfig,
) -> Result<CommitPlot, PlotError> {
    let intervals: Vec<ResolvedGaze> = resolved
        .iter()
        .filter(|g| g.sample.href == commit.href)
        .cloned()
        .collect();
    if intervals.is_empty() {
        return Err(PlotError::EmptyCommitGazeSet {
            href: commit.href.clone(),
        });
    }

    let unmapped = intervals
        .iter()
        .filter(|g| g.row == ResolvedGaze::UNMAPPED_ROW)
        .count();
    if unmapped > 0 {
        warn!(href = %commit.href, unmapped, "intervals without a split-view row");
    }

    let resampler = Resampler::new(&intervals, config.sample_period());
    let origin_ms = resampler.origin();
    let span_ms = resampler.span();
    let points: Vec<SamplePoint> = resampler.collect();
    debug!(
        href = %commit.href,
        intervals = intervals.len(),
        points = points.len(),
        span_ms,
        "resampled commit"
    );

    Ok(CommitPlot {
        href: commit.href.clone(),
        origin_ms,
        span_ms,
        points,
        row_colors: row_colors(commit),
        row_kinds: commit
            .rows()
            .map(|kind| match kind {
                RowKind::Line(t) => t.to_string(),
                RowKind::Separator => "separator".to_string(),
            })
            .collect(),
        intervals,
    })
}

/// Run the whole pipeline: one result per commit, in log order.
pub fn analyze(log: &GazeLog, config: &PipelineConfig) -> Vec<Result<CommitPlot, PlotError>> {
    let resolved = resolve_log(log, config);
    log.commits
        .iter()
        .map(|commit| plot_commit(commit, &resolved, config))
        .collect()
}
