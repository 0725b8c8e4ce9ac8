//! On-disk layout of rendered figures and exported series.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gaze_plot_protocol::Viewport;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::analysis::CommitPlot;
use crate::svg::render_svg;
use crate::views::figure::render_commit_figure;
use crate::views::timeline::SamplePoint;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("serialize series: {0}")]
    Json(#[from] serde_json::Error),
}

/// Strip the optional `.txt` suffix from a session log name.
pub fn input_stem(filename: &str) -> &str {
    filename.strip_suffix(".txt").unwrap_or(filename)
}

/// File-name-safe form of a page href: anything outside `[A-Za-z0-9._-]`
/// becomes `_` and a leading run of separators is dropped. The readable part
/// is lossy (`/a/b` and `/a_b` read the same), so it is suffixed with the
/// first 8 hex digits of the href's SHA-256 to keep every page's files apart.
pub fn href_slug(href: &str) -> String {
    let slug: String = href
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let readable = match slug.trim_start_matches(['_', '.']) {
        "" => "page",
        trimmed => trimmed,
    };

    let digest = format!("{:x}", Sha256::digest(href.as_bytes()));
    format!("{readable}-{}", &digest[..8])
}

/// `<root>/<input stem>/<href slug>.<ext>`
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    stem: String,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, input: &str) -> Self {
        Self {
            root: root.into(),
            stem: input_stem(input).to_string(),
        }
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.stem)
    }

    pub fn figure_path(&self, href: &str) -> PathBuf {
        self.dir().join(format!("{}.svg", href_slug(href)))
    }

    pub fn series_path(&self, href: &str) -> PathBuf {
        self.dir().join(format!("{}.json", href_slug(href)))
    }

    /// Render `plot` as SVG and write it to its figure path.
    pub fn write_figure(
        &self,
        plot: &CommitPlot,
        viewport: &Viewport,
    ) -> Result<PathBuf, OutputError> {
        let commands = render_commit_figure(plot, viewport);
        let svg = render_svg(&commands, viewport.width, viewport.height);
        let path = self.figure_path(&plot.href);
        write_file(&path, svg.as_bytes())?;
        Ok(path)
    }

    /// Write `plot`'s series as pretty JSON next to its figure.
    pub fn write_series(&self, plot: &CommitPlot) -> Result<PathBuf, OutputError> {
        let json = serde_json::to_vec_pretty(&SeriesExport::from(plot))?;
        let path = self.series_path(&plot.href);
        write_file(&path, &json)?;
        Ok(path)
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}

/// Machine-readable dump of one commit's series.
#[derive(Debug, Serialize)]
pub struct SeriesExport<'a> {
    pub href: &'a str,
    pub origin_ms: f64,
    pub span_ms: f64,
    pub rows: &'a [String],
    pub points: &'a [SamplePoint],
    pub intervals: Vec<IntervalExport<'a>>,
}

/// A fixation interval relative to the series origin.
#[derive(Debug, Serialize)]
pub struct IntervalExport<'a> {
    pub start_ms: f64,
    pub end_ms: f64,
    #[serde(rename = "type")]
    pub line_type: &'a str,
    pub row: i64,
}

impl<'a> From<&'a CommitPlot> for SeriesExport<'a> {
    fn from(plot: &'a CommitPlot) -> Self {
        Self {
            href: &plot.href,
            origin_ms: plot.origin_ms,
            span_ms: plot.span_ms,
            rows: &plot.row_kinds,
            points: &plot.points,
            intervals: plot
                .intervals
                .iter()
                .map(|g| IntervalExport {
                    start_ms: g.start() - plot.origin_ms,
                    end_ms: g.end() - plot.origin_ms,
                    line_type: g.sample.line.line_type.as_str(),
                    row: g.row,
                })
                .collect(),
        }
    }
}
