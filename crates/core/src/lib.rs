//! Reconstruct where a reviewer's gaze sat on a code diff over time.
//!
//! ```text
//!   NDJSON log ──▶ parsers ──▶ coalesce ──▶ resolve ──▶ views::timeline ──▶ views::figure ──▶ svg
//!                  (diffs,      (fixation    (commit      (resampled           (RenderCommand[])
//!                   gazes)       intervals)   rows)        series)
//! ```

pub mod analysis;
pub mod coalesce;
pub mod config;
pub mod model;
pub mod output;
pub mod parsers;
pub mod resolve;
pub mod svg;
pub mod views;

pub use analysis::{CommitPlot, PlotError, analyze, plot_commit, resolve_log};
pub use config::{ConfigError, PipelineConfig};
pub use output::{OutputError, OutputLayout};
pub use parsers::{GazeLog, GazeLogParseError, parse_gaze_log};
