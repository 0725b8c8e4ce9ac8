use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::model::{Commit, Diff, DiffIndex, GazeSample, Line, LineDetail, LineRef, LineType};

/// Gazes on this target cover a whole file body, not one line.
const FILE_CODE_TARGET: &str = "File code";
/// Transient UI state logged while a hunk is being expanded.
const EXPANDED_CHANGE: &str = "expanded";

#[derive(Debug, Error)]
pub enum GazeLogParseError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
    #[error("line {line}: `{record}` record is missing required field `{field}`")]
    MissingField {
        line: usize,
        record: &'static str,
        field: &'static str,
    },
}

/// Everything the pipeline needs from one eye-tracking session log.
#[derive(Debug, Clone, Default)]
pub struct GazeLog {
    /// One entry per commit page, in order of first appearance.
    pub commits: Vec<Commit>,
    /// Graphable gaze samples in log order.
    pub samples: Vec<GazeSample>,
    /// Records that were read but carry nothing to graph.
    pub skipped: usize,
}

impl GazeLog {
    pub fn commit(&self, href: &str) -> Option<&Commit> {
        self.commits.iter().find(|c| c.href == href)
    }
}

/// Parse a newline-delimited JSON session log.
///
/// Each line is one record tagged by its `type` field. `diffs` records
/// describe the diff pages, `gaze` records the samples; every other type
/// (`pageView`, `pageChange`, …) is ignored. With `split` set, each diff
/// gets the index map needed to place split-view lines on unified rows.
pub fn parse_gaze_log(data: &[u8], split: bool) -> Result<GazeLog, GazeLogParseError> {
    let text = std::str::from_utf8(data)?;
    let mut log = GazeLog::default();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let value: Value =
            serde_json::from_str(raw).map_err(|source| GazeLogParseError::Json { line, source })?;

        match value.get("type").and_then(Value::as_str) {
            Some("diffs") => {
                let record: RawDiffsRecord = serde_json::from_value(value)
                    .map_err(|source| GazeLogParseError::Json { line, source })?;
                let commit = record.into_commit(line, split)?;
                insert_commit(&mut log.commits, commit);
            }
            Some("gaze") => {
                let record: RawGaze = serde_json::from_value(value)
                    .map_err(|source| GazeLogParseError::Json { line, source })?;
                if record.is_graphable() {
                    log.samples.push(record.into_sample(line)?);
                } else {
                    debug!(line, target = ?record.target, "skipping gaze off the diff lines");
                    log.skipped += 1;
                }
            }
            other => {
                debug!(line, kind = ?other, "skipping record");
                log.skipped += 1;
            }
        }
    }

    Ok(log)
}

/// A later `diffs` record for the same page supersedes the earlier one.
fn insert_commit(commits: &mut Vec<Commit>, commit: Commit) {
    match commits.iter_mut().find(|c| c.href == commit.href) {
        Some(existing) => {
            debug!(href = %commit.href, "replacing diffs for page");
            *existing = commit;
        }
        None => commits.push(commit),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiffsRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    page_href: Option<String>,
    #[serde(default)]
    diffs: Vec<Option<RawDiff>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiff {
    #[serde(default, deserialize_with = "lenient_string")]
    file: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    page_href: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    diff_index: Option<String>,
    #[serde(default)]
    all_line_details: Vec<RawLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLine {
    #[serde(default, deserialize_with = "lenient_u32")]
    index: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    target: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    change: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    diff_index: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    file: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    code_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    old_line_num: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    new_line_num: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    length: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    indent_value: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    indent_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    old_start: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    old_end: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    new_start: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    new_end: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGaze {
    #[serde(default, deserialize_with = "lenient_string")]
    target: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    timestamp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    timestamp_end: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    domain: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    page_href: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    page_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    index: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    diff_index: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    file: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    change: Option<String>,
}

impl RawDiffsRecord {
    fn into_commit(self, line: usize, split: bool) -> Result<Commit, GazeLogParseError> {
        let href = self
            .page_href
            .clone()
            .or_else(|| {
                self.diffs
                    .iter()
                    .flatten()
                    .find_map(|d| d.page_href.clone())
            })
            .ok_or(GazeLogParseError::MissingField {
                line,
                record: "diffs",
                field: "pageHref",
            })?;

        let mut diffs = Vec::with_capacity(self.diffs.len());
        for raw in self.diffs.into_iter().flatten() {
            let diff = raw.into_diff(line, &href)?;
            diffs.push(if split { diff.with_split_index() } else { diff });
        }

        Ok(Commit::new(href, diffs))
    }
}

impl RawDiff {
    fn into_diff(self, line: usize, commit_href: &str) -> Result<Diff, GazeLogParseError> {
        let index = self
            .diff_index
            .map(DiffIndex::new)
            .ok_or(GazeLogParseError::MissingField {
                line,
                record: "diffs",
                field: "diffIndex",
            })?;
        let href = self.page_href.unwrap_or_else(|| commit_href.to_string());

        let lines = self
            .all_line_details
            .into_iter()
            .map(|raw| raw.into_line(line, &index, self.file.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Diff::new(href, index, self.file, lines))
    }
}

impl RawLine {
    fn into_line(
        self,
        line: usize,
        diff_index: &DiffIndex,
        diff_file: Option<&str>,
    ) -> Result<Line, GazeLogParseError> {
        let missing = |field| GazeLogParseError::MissingField {
            line,
            record: "diffs",
            field,
        };

        let index = self.index.ok_or_else(|| missing("index"))?;
        let line_type = LineType::classify(self.target.as_deref(), self.change.as_deref())
            .ok_or_else(|| missing("change"))?;

        let detail = match line_type {
            LineType::Expandable => LineDetail::Marker {
                old_start: self.old_start,
                old_end: self.old_end,
                new_start: self.new_start,
                new_end: self.new_end,
            },
            LineType::Comment => LineDetail::Comment,
            LineType::Addition | LineType::Deletion | LineType::Unchanged
                if self.old_line_num.is_none() && self.new_line_num.is_none() =>
            {
                return Err(missing("oldLineNum"));
            }
            _ => LineDetail::Change {
                old_line_num: self.old_line_num,
                new_line_num: self.new_line_num,
                length: self.length,
                indent_value: self.indent_value,
                indent_type: self.indent_type,
            },
        };

        Ok(Line {
            key: LineRef {
                index,
                line_type,
                diff_index: self
                    .diff_index
                    .map_or_else(|| diff_index.clone(), DiffIndex::new),
                file: self.file.or_else(|| diff_file.map(str::to_string)),
            },
            text: self.code_text,
            detail,
        })
    }
}

impl RawGaze {
    /// Only samples anchored to a concrete, stable, classifiable diff line
    /// are plotted. Older loggers omit `change` on some gazes; those have no
    /// line id to join on and are skipped like any other off-line sample.
    fn is_graphable(&self) -> bool {
        self.index.is_some()
            && self.target.as_deref() != Some(FILE_CODE_TARGET)
            && self.diff_index.is_some()
            && self.change.as_deref() != Some(EXPANDED_CHANGE)
            && LineType::classify(self.target.as_deref(), self.change.as_deref()).is_some()
    }

    fn into_sample(self, line: usize) -> Result<GazeSample, GazeLogParseError> {
        let missing = |field| GazeLogParseError::MissingField {
            line,
            record: "gaze",
            field,
        };

        let start = self.timestamp.ok_or_else(|| missing("timestamp"))?;
        let end = self.timestamp_end.ok_or_else(|| missing("timestampEnd"))?;
        let href = self.page_href.ok_or_else(|| missing("pageHref"))?;
        let index = self.index.ok_or_else(|| missing("index"))?;
        let diff_index = self.diff_index.ok_or_else(|| missing("diffIndex"))?;
        let line_type = LineType::classify(self.target.as_deref(), self.change.as_deref())
            .ok_or_else(|| missing("change"))?;

        Ok(GazeSample {
            target: self.target,
            start,
            end,
            duration: self.duration.unwrap_or(end - start),
            href,
            domain: self.domain,
            page_type: self.page_type,
            line: LineRef {
                index,
                line_type,
                diff_index: DiffIndex::new(diff_index),
                file: self.file,
            },
        })
    }
}

// Older loggers wrote numbers as strings and vice versa. Fields are read
// leniently and a value of the wrong shape counts as absent.

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
