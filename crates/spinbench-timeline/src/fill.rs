use crate::config::{FillMode, NS_PER_SEC};

/// Start time of `bin`, in seconds.
#[inline]
pub fn bin_start_s(bin: usize, bin_size_ns: u64) -> f64 {
    (bin as u64 * bin_size_ns) as f64 / NS_PER_SEC
}

/// Occupied seconds per bin for one worker's column of counts.
///
/// Partial fills are not clamped to the bin; only the final interval of a worker
/// is clamped, after merging.
pub fn fill_lengths(
    counts: &[u64],
    bin_size_ns: u64,
    avg_iteration_ns: f64,
    mode: FillMode,
) -> Vec<f64> {
    let partial = |c: u64| c as f64 * avg_iteration_ns / NS_PER_SEC;
    match mode {
        FillMode::Partial => counts.iter().map(|&c| partial(c)).collect(),
        FillMode::FullThenPartial => {
            let bin_s = bin_size_ns as f64 / NS_PER_SEC;
            let last_active = counts.iter().rposition(|&c| c > 0);
            counts
                .iter()
                .enumerate()
                .map(|(i, &c)| match last_active {
                    Some(last) if i == last => partial(c),
                    _ if c > 0 => bin_s,
                    _ => 0.0,
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_scales_counts() {
        let f = fill_lengths(&[5, 0, 2], 200_000_000, 40_000_000.0, FillMode::Partial);
        assert_eq!(f, vec![0.2, 0.0, 0.08]);
    }

    #[test]
    fn full_then_partial_only_last_active_bin_is_partial() {
        let f = fill_lengths(
            &[1, 0, 3, 2, 0],
            100_000_000,
            10_000_000.0,
            FillMode::FullThenPartial,
        );
        assert_eq!(f, vec![0.1, 0.0, 0.1, 0.02, 0.0]);
    }

    #[test]
    fn full_then_partial_idle_worker_is_empty() {
        let f = fill_lengths(
            &[0, 0],
            100_000_000,
            10_000_000.0,
            FillMode::FullThenPartial,
        );
        assert_eq!(f, vec![0.0, 0.0]);
    }

    #[test]
    fn bin_starts_are_exact_multiples() {
        assert_eq!(bin_start_s(0, 200_000_000), 0.0);
        assert_eq!(bin_start_s(3, 200_000_000), 0.6);
    }
}
