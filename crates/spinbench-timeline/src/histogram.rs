use spinbench_grid::OccupancyGrid;

use crate::config::NS_PER_SEC;
use crate::error::TimelineError;

/// Per-worker iteration totals up to the playback cursor.
#[derive(Clone, Copy, Debug)]
pub struct HistogramAggregator {
    bin_size_ns: u64,
    worker_count: usize,
}

impl HistogramAggregator {
    pub fn new(bin_size_ns: u64, worker_count: usize) -> Result<Self, TimelineError> {
        if bin_size_ns == 0 {
            return Err(TimelineError::InvalidBinSize(bin_size_ns));
        }
        if worker_count == 0 {
            return Err(TimelineError::InvalidWorkerCount);
        }
        Ok(Self {
            bin_size_ns,
            worker_count,
        })
    }

    /// Exclusive bin bound for `cursor_s`: the bin under the cursor is included,
    /// never past the last bin. The cursor is rounded to whole nanoseconds first so
    /// a cursor on a bin boundary lands in the bin that starts there. A cursor less
    /// than half a nanosecond short of a boundary therefore also counts the next bin.
    pub fn bins_through(&self, bins: usize, cursor_s: f64) -> usize {
        let cursor_ns = (cursor_s.max(0.0) * NS_PER_SEC).round() as u64;
        let bin = cursor_ns / self.bin_size_ns;
        usize::try_from(bin.saturating_add(1))
            .unwrap_or(usize::MAX)
            .min(bins)
    }

    pub fn cumulative_counts(
        &self,
        grid: &OccupancyGrid,
        cursor_s: f64,
    ) -> Result<Vec<u64>, TimelineError> {
        if grid.workers() != self.worker_count {
            return Err(TimelineError::GridShapeMismatch {
                bins: grid.bins(),
                workers: grid.workers(),
                expected_bins: grid.bins(),
                expected_workers: self.worker_count,
            });
        }
        let end = self.bins_through(grid.bins(), cursor_s);
        let mut totals = vec![0u64; self.worker_count];
        for bin in 0..end {
            for (total, &c) in totals.iter_mut().zip(grid.row(bin)) {
                *total += c;
            }
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> OccupancyGrid {
        // 4 bins x 2 workers
        OccupancyGrid::from_row_major(4, 2, vec![1, 10, 2, 20, 3, 30, 4, 40]).unwrap()
    }

    #[test]
    fn cursor_at_zero_includes_first_bin() {
        let h = HistogramAggregator::new(200_000_000, 2).unwrap();
        assert_eq!(h.cumulative_counts(&grid(), 0.0).unwrap(), vec![1, 10]);
    }

    #[test]
    fn boundary_cursor_includes_boundary_bin() {
        let h = HistogramAggregator::new(200_000_000, 2).unwrap();
        assert_eq!(h.cumulative_counts(&grid(), 0.4).unwrap(), vec![6, 60]);
        assert_eq!(h.cumulative_counts(&grid(), 0.39).unwrap(), vec![3, 30]);
    }

    #[test]
    fn cursor_snaps_to_whole_nanoseconds() {
        let h = HistogramAggregator::new(200_000_000, 2).unwrap();
        assert_eq!(h.bins_through(4, 0.4 - 1e-10), 3);
        assert_eq!(h.bins_through(4, 0.4 - 1e-9), 2);
    }

    #[test]
    fn cursor_past_end_is_capped() {
        let h = HistogramAggregator::new(200_000_000, 2).unwrap();
        assert_eq!(h.cumulative_counts(&grid(), 0.8).unwrap(), vec![10, 100]);
        assert_eq!(h.cumulative_counts(&grid(), 50.0).unwrap(), vec![10, 100]);
        assert_eq!(h.bins_through(4, f64::INFINITY), 4);
    }

    #[test]
    fn negative_cursor_acts_like_zero() {
        let h = HistogramAggregator::new(200_000_000, 2).unwrap();
        assert_eq!(h.cumulative_counts(&grid(), -1.0).unwrap(), vec![1, 10]);
    }

    #[test]
    fn worker_mismatch_is_rejected() {
        let h = HistogramAggregator::new(200_000_000, 3).unwrap();
        assert!(h.cumulative_counts(&grid(), 0.0).is_err());
        assert!(HistogramAggregator::new(0, 3).is_err());
    }
}
