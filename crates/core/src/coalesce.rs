//! Merge fragmented gaze samples into fixation intervals.

use tracing::debug;

use crate::config::PipelineConfig;
use crate::model::GazeSample;

/// Sort, coalesce and de-noise raw samples into fixation intervals.
pub fn fixations(samples: &[GazeSample], config: &PipelineConfig) -> Vec<GazeSample> {
    let mut sorted = samples.to_vec();
    sort_by_start(&mut sorted);

    let merged = coalesce(&sorted, config.merge_threshold());
    let before = merged.len();
    let kept = drop_noise(merged, config.ignore_threshold());
    debug!(
        samples = samples.len(),
        intervals = before,
        dropped = before - kept.len(),
        "coalesced gaze samples"
    );
    kept
}

/// Stable sort by start timestamp.
pub fn sort_by_start(samples: &mut [GazeSample]) {
    samples.sort_by(|a, b| a.start.total_cmp(&b.start));
}

/// Fold runs of consecutive samples on the same line into one interval.
///
/// `samples` must already be sorted by start. Each run is led by its first
/// sample, which absorbs every following sample that
/// [continues](GazeSample::continues_with) it; the input is left untouched.
pub fn coalesce(samples: &[GazeSample], merge_ms: f64) -> Vec<GazeSample> {
    let mut out = Vec::with_capacity(samples.len());
    let mut iter = samples.iter();
    let Some(first) = iter.next() else {
        return out;
    };

    let mut run = first.clone();
    for next in iter {
        if run.continues_with(next, merge_ms) {
            run.absorb(next);
        } else {
            out.push(std::mem::replace(&mut run, next.clone()));
        }
    }
    out.push(run);
    out
}

/// Drop intervals too short to be a real fixation.
pub fn drop_noise(intervals: Vec<GazeSample>, ignore_ms: f64) -> Vec<GazeSample> {
    intervals
        .into_iter()
        .filter(|g| g.duration > ignore_ms)
        .collect()
}
