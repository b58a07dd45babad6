//! The counting loop every worker runs, whatever primitive it is scheduled on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Timing shared by all workers of one run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SpinClock {
    pub t_ref: Instant,
    pub bin_size_ns: u64,
    pub bins: usize,
}

impl SpinClock {
    /// Bin the current instant falls in, or `None` once the run is over.
    #[inline]
    pub fn current_bin(&self) -> Option<usize> {
        let elapsed = self.t_ref.elapsed().as_nanos();
        let idx = elapsed / u128::from(self.bin_size_ns);
        if idx >= self.bins as u128 {
            None
        } else {
            Some(idx as usize)
        }
    }

    /// Increment as fast as possible until the clock runs past the last bin.
    pub fn spin(&self, delay: Option<Duration>, mut hit: impl FnMut(usize)) {
        while let Some(bin) = self.current_bin() {
            hit(bin);
            if let Some(d) = delay {
                thread::sleep(d);
            }
        }
    }

    /// Counts into a private column, as workers that report at the end do.
    pub fn spin_private(&self, delay: Option<Duration>) -> Vec<u64> {
        let mut column = vec![0u64; self.bins];
        self.spin(delay, |bin| column[bin] += 1);
        column
    }

    /// Counts into the shared row-major array at `[bin * workers + worker]`.
    pub fn spin_shared(
        &self,
        counters: &[AtomicU64],
        workers: usize,
        worker: usize,
        delay: Option<Duration>,
    ) {
        self.spin(delay, |bin| {
            counters[bin * workers + worker].fetch_add(1, Ordering::Relaxed);
        });
    }
}
