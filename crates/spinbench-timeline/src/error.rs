use thiserror::Error;

/// Contract violations in timeline configuration or input shape.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelineError {
    #[error("bin size must be positive (got {0} ns)")]
    InvalidBinSize(u64),
    #[error("worker count must be positive")]
    InvalidWorkerCount,
    #[error("timeline duration must be positive and finite (got {0} s)")]
    InvalidDuration(f64),
    #[error("merge threshold must lie strictly between 0 and 1 (got {0})")]
    InvalidMergeThreshold(f64),
    #[error("average iteration time must be finite and non-negative (got {0} ns)")]
    InvalidIterationTime(f64),
    #[error("playback step must be positive and finite (got {0} s)")]
    InvalidStep(f64),
    #[error("expected {expected} colors, one per worker, got {actual}")]
    ColorCountMismatch { expected: usize, actual: usize },
    #[error("grid is {bins}x{workers} but the timeline expects {expected_bins}x{expected_workers}")]
    GridShapeMismatch {
        bins: usize,
        workers: usize,
        expected_bins: usize,
        expected_workers: usize,
    },
}
