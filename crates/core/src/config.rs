use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sample period must be at least 1ms")]
    ZeroSamplePeriod,
}

/// Tunables shared read-only by every stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// The log was recorded against a split (side-by-side) diff.
    pub split: bool,
    /// Resampling period in milliseconds.
    pub sample_period_ms: u32,
    /// Coalesced intervals this short or shorter are dropped as noise.
    pub ignore_threshold_ms: u32,
    /// Gap under which two samples on the same line are one fixation.
    pub merge_threshold_ms: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            split: false,
            sample_period_ms: 10,
            ignore_threshold_ms: 50,
            merge_threshold_ms: 200,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_period_ms == 0 {
            return Err(ConfigError::ZeroSamplePeriod);
        }
        Ok(())
    }

    pub fn sample_period(&self) -> f64 {
        f64::from(self.sample_period_ms)
    }

    pub fn ignore_threshold(&self) -> f64 {
        f64::from(self.ignore_threshold_ms)
    }

    pub fn merge_threshold(&self) -> f64 {
        f64::from(self.merge_threshold_ms)
    }
}
