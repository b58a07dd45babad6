use std::str::FromStr;

use serde::Deserialize;
use spinbench_grid::OccupancyGrid;

use crate::error::TimelineError;
use crate::palette::Rgb;

pub const NS_PER_SEC: f64 = 1e9;
/// Widths at or below this are treated as empty.
pub const WIDTH_EPSILON: f64 = 1e-9;
pub const DEFAULT_MERGE_THRESHOLD: f64 = 0.9;

/// How a bin's count is turned into an occupied duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillMode {
    /// `count * avg_iteration` for every bin.
    #[default]
    Partial,
    /// Whole bins for every active bin except the worker's last one, which is partial.
    FullThenPartial,
}

impl FromStr for FillMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partial" => Ok(FillMode::Partial),
            "full-then-partial" | "full" => Ok(FillMode::FullThenPartial),
            other => Err(format!(
                "unknown fill mode '{other}' (expected 'partial' or 'full-then-partial')"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineConfig {
    pub bin_size_ns: u64,
    pub worker_count: usize,
    pub duration_s: f64,
    pub avg_iteration_ns: f64,
    pub fill_mode: FillMode,
    pub merge_threshold: f64,
    pub colors: Vec<Rgb>,
}

impl TimelineConfig {
    pub fn new(bin_size_ns: u64, duration_s: f64, colors: Vec<Rgb>) -> Self {
        Self {
            bin_size_ns,
            worker_count: colors.len(),
            duration_s,
            avg_iteration_ns: 0.0,
            fill_mode: FillMode::default(),
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            colors,
        }
    }

    pub fn with_avg_iteration_ns(mut self, ns: f64) -> Self {
        self.avg_iteration_ns = ns;
        self
    }

    pub fn with_fill_mode(mut self, mode: FillMode) -> Self {
        self.fill_mode = mode;
        self
    }

    pub fn with_merge_threshold(mut self, threshold: f64) -> Self {
        self.merge_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        if self.bin_size_ns == 0 {
            return Err(TimelineError::InvalidBinSize(self.bin_size_ns));
        }
        if self.worker_count == 0 {
            return Err(TimelineError::InvalidWorkerCount);
        }
        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            return Err(TimelineError::InvalidDuration(self.duration_s));
        }
        if !(self.merge_threshold > 0.0 && self.merge_threshold < 1.0) {
            return Err(TimelineError::InvalidMergeThreshold(self.merge_threshold));
        }
        if !(self.avg_iteration_ns.is_finite() && self.avg_iteration_ns >= 0.0) {
            return Err(TimelineError::InvalidIterationTime(self.avg_iteration_ns));
        }
        if self.colors.len() != self.worker_count {
            return Err(TimelineError::ColorCountMismatch {
                expected: self.worker_count,
                actual: self.colors.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn bin_size_s(&self) -> f64 {
        self.bin_size_ns as f64 / NS_PER_SEC
    }

    /// `ceil(duration / bin_size)`, computed on whole nanoseconds.
    pub fn expected_bins(&self) -> usize {
        expected_bins(self.duration_s, self.bin_size_ns)
    }

    pub fn check_grid(&self, grid: &OccupancyGrid) -> Result<(), TimelineError> {
        let expected_bins = self.expected_bins();
        if grid.bins() != expected_bins || grid.workers() != self.worker_count {
            return Err(TimelineError::GridShapeMismatch {
                bins: grid.bins(),
                workers: grid.workers(),
                expected_bins,
                expected_workers: self.worker_count,
            });
        }
        Ok(())
    }
}

/// Number of bins needed to cover `duration_s` with bins of `bin_size_ns`.
pub fn expected_bins(duration_s: f64, bin_size_ns: u64) -> usize {
    if bin_size_ns == 0 {
        return 0;
    }
    let duration_ns = (duration_s.max(0.0) * NS_PER_SEC).round() as u64;
    duration_ns.div_ceil(bin_size_ns) as usize
}
