//! Occupancy grid handed from the counting workers to the timeline builders.
#![forbid(unsafe_code)]

pub mod stats;

pub use stats::GridStats;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one bin and one worker (got {bins}x{workers})")]
    EmptyDimension { bins: usize, workers: usize },
    #[error("expected {expected} counters for {bins} bins x {workers} workers, got {actual}")]
    LengthMismatch {
        bins: usize,
        workers: usize,
        expected: usize,
        actual: usize,
    },
    #[error("worker {worker} reported {actual} bins, expected {expected}")]
    RaggedColumn {
        worker: usize,
        expected: usize,
        actual: usize,
    },
}

/// Per-bin, per-worker iteration counts, row-major by bin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    bins: usize,
    workers: usize,
    counts: Vec<u64>,
}

impl OccupancyGrid {
    /// Builds a grid from the shared-counter layout (`counts[bin * workers + worker]`).
    pub fn from_row_major(
        bins: usize,
        workers: usize,
        counts: Vec<u64>,
    ) -> Result<Self, GridError> {
        if bins == 0 || workers == 0 {
            return Err(GridError::EmptyDimension { bins, workers });
        }
        let expected = bins * workers;
        if counts.len() != expected {
            return Err(GridError::LengthMismatch {
                bins,
                workers,
                expected,
                actual: counts.len(),
            });
        }
        Ok(Self {
            bins,
            workers,
            counts,
        })
    }

    /// Builds a grid from one private column per worker, transposing into bin-major order.
    pub fn from_columns(columns: &[Vec<u64>]) -> Result<Self, GridError> {
        let workers = columns.len();
        let bins = columns.first().map(|c| c.len()).unwrap_or(0);
        if bins == 0 || workers == 0 {
            return Err(GridError::EmptyDimension { bins, workers });
        }
        if let Some((worker, col)) = columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != bins)
        {
            return Err(GridError::RaggedColumn {
                worker,
                expected: bins,
                actual: col.len(),
            });
        }
        let mut counts = Vec::with_capacity(bins * workers);
        for bin in 0..bins {
            counts.extend(columns.iter().map(|col| col[bin]));
        }
        Ok(Self {
            bins,
            workers,
            counts,
        })
    }

    /// All-zero grid, mostly useful for disabled runs and tests.
    pub fn zeroed(bins: usize, workers: usize) -> Result<Self, GridError> {
        Self::from_row_major(bins, workers, vec![0; bins * workers])
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    #[inline]
    pub fn idx(&self, bin: usize, worker: usize) -> usize {
        bin * self.workers + worker
    }

    #[inline]
    pub fn get(&self, bin: usize, worker: usize) -> u64 {
        self.counts[self.idx(bin, worker)]
    }

    /// One bin's counts across all workers.
    #[inline]
    pub fn row(&self, bin: usize) -> &[u64] {
        let start = bin * self.workers;
        &self.counts[start..start + self.workers]
    }

    /// One worker's counts across all bins, in bin order.
    pub fn column(&self, worker: usize) -> impl ExactSizeIterator<Item = u64> + '_ {
        debug_assert!(worker < self.workers);
        (0..self.bins).map(move |bin| self.get(bin, worker))
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn stats(&self, bin_size_ns: u64) -> GridStats {
        GridStats::from_grid(self, bin_size_ns)
    }
}
