use super::OccupancyGrid;

/// Throughput summary of a collected grid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridStats {
    pub total_iterations: u64,
    /// Bins in which at least one worker counted.
    pub nonzero_bins: usize,
    /// Mean per-worker count over the non-zero bins.
    pub avg_nonzero_bin_value: Option<f64>,
    /// Estimated duration of one loop iteration, in nanoseconds.
    pub avg_iteration_ns: Option<f64>,
}

impl GridStats {
    pub fn from_grid(grid: &OccupancyGrid, bin_size_ns: u64) -> Self {
        let mut bin_sum: u64 = 0;
        let mut nonzero_bins = 0usize;
        for bin in 0..grid.bins() {
            let row_sum: u64 = grid.row(bin).iter().sum();
            if row_sum > 0 {
                bin_sum += row_sum;
                nonzero_bins += 1;
            }
        }
        let avg_nonzero_bin_value = if nonzero_bins > 0 {
            Some(bin_sum as f64 / nonzero_bins as f64 / grid.workers() as f64)
        } else {
            None
        };
        let avg_iteration_ns = avg_nonzero_bin_value
            .filter(|v| *v > 0.0)
            .map(|v| bin_size_ns as f64 / v);
        Self {
            total_iterations: grid.total(),
            nonzero_bins,
            avg_nonzero_bin_value,
            avg_iteration_ns,
        }
    }

    /// Iteration time to feed the fill-length estimate; zero when nothing ran.
    #[inline]
    pub fn iteration_ns_or_zero(&self) -> f64 {
        self.avg_iteration_ns.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_only_over_active_bins() {
        // 2 workers, 3 bins; bin 2 idle.
        let grid = OccupancyGrid::from_row_major(3, 2, vec![4, 6, 10, 0, 0, 0]).unwrap();
        let stats = grid.stats(1_000);
        assert_eq!(stats.total_iterations, 20);
        assert_eq!(stats.nonzero_bins, 2);
        assert_eq!(stats.avg_nonzero_bin_value, Some(5.0));
        assert_eq!(stats.avg_iteration_ns, Some(200.0));
    }

    #[test]
    fn idle_grid_has_no_iteration_estimate() {
        let grid = OccupancyGrid::zeroed(5, 2).unwrap();
        let stats = grid.stats(1_000);
        assert_eq!(stats.nonzero_bins, 0);
        assert_eq!(stats.avg_iteration_ns, None);
        assert_eq!(stats.iteration_ns_or_zero(), 0.0);
    }
}
