//! Busy-loop producers: run workers on different concurrency primitives and
//! hand back their per-bin iteration counts as an [`OccupancyGrid`].
#![forbid(unsafe_code)]

mod spin;

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicU64;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, unbounded};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::Deserialize;
use spinbench_grid::{GridError, GridStats, OccupancyGrid};
use thiserror::Error;

use crate::spin::SpinClock;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("a run needs at least one worker, one bin and a positive bin size")]
    EmptyRun,
    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
    #[error("worker {0} never reported its counts")]
    WorkerLost(usize),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Concurrency primitive the workers run on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// OS threads incrementing one shared atomic counter array.
    Threads,
    /// OS threads counting privately and sending their column over a channel.
    Channels,
    /// A rayon pool mapping the private counting task over workers.
    Pool,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Threads, Strategy::Channels, Strategy::Pool];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Threads => "Threads (shared counters)",
            Strategy::Channels => "Threads (channels)",
            Strategy::Pool => "Worker pool",
        }
    }

    /// Axis label for the worker rows of this strategy's chart.
    pub fn instance_name(self) -> &'static str {
        match self {
            Strategy::Threads | Strategy::Channels => "Thread",
            Strategy::Pool => "Worker",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threads" => Ok(Strategy::Threads),
            "channels" => Ok(Strategy::Channels),
            "pool" => Ok(Strategy::Pool),
            other => Err(format!(
                "unknown strategy '{other}' (expected threads, channels or pool)"
            )),
        }
    }
}

/// What each worker does between increments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Workload {
    /// Spin without pause.
    Cpu,
    /// Even-indexed workers sleep `delay` after every increment; odd ones spin.
    MixedIo { delay: Duration },
}

impl Workload {
    #[inline]
    pub fn delay_for(self, worker: usize) -> Option<Duration> {
        match self {
            Workload::Cpu => None,
            Workload::MixedIo { delay } if worker % 2 == 0 => Some(delay),
            Workload::MixedIo { .. } => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Workload::Cpu => "CPU intensive",
            Workload::MixedIo { .. } => "IO intensive",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CollectConfig {
    pub workers: usize,
    pub bins: usize,
    pub bin_size_ns: u64,
    pub strategy: Strategy,
    pub workload: Workload,
}

impl CollectConfig {
    pub fn title(&self) -> String {
        format!("{} ({})", self.strategy.label(), self.workload.label())
    }

    fn validate(&self) -> Result<(), CollectError> {
        if self.workers == 0 || self.bins == 0 || self.bin_size_ns == 0 {
            return Err(CollectError::EmptyRun);
        }
        Ok(())
    }
}

/// A finished run, ready for the timeline builders.
#[derive(Clone, Debug)]
pub struct Collection {
    pub config: CollectConfig,
    pub grid: OccupancyGrid,
    pub wall: Duration,
    pub stats: GridStats,
}

pub fn collect(cfg: &CollectConfig) -> Result<Collection, CollectError> {
    cfg.validate()?;
    log::info!("Collecting data with {}...", cfg.title());
    let t0 = Instant::now();
    let grid = match cfg.strategy {
        Strategy::Threads => collect_shared(cfg)?,
        Strategy::Channels => collect_channels(cfg)?,
        Strategy::Pool => collect_pool(cfg)?,
    };
    let wall = t0.elapsed();
    let stats = grid.stats(cfg.bin_size_ns);
    log::info!("{} results:", cfg.title());
    log::info!("  Total execution time: {:.1} ms", wall.as_secs_f64() * 1e3);
    log::info!("  Total iterations: {}", stats.total_iterations);
    match (stats.avg_nonzero_bin_value, stats.avg_iteration_ns) {
        (Some(avg), Some(t)) => {
            log::info!("  Average non-zero bin value: {:.0}", avg);
            log::info!("  Average iteration time: {:.1} ns", t);
        }
        _ => log::warn!("  No iterations were recorded"),
    }
    Ok(Collection {
        config: *cfg,
        grid,
        wall,
        stats,
    })
}

fn collect_shared(cfg: &CollectConfig) -> Result<OccupancyGrid, CollectError> {
    let counters: Vec<AtomicU64> = (0..cfg.bins * cfg.workers)
        .map(|_| AtomicU64::new(0))
        .collect();
    let clock = SpinClock {
        t_ref: Instant::now(),
        bin_size_ns: cfg.bin_size_ns,
        bins: cfg.bins,
    };
    thread::scope(|s| -> Result<(), CollectError> {
        let mut handles = Vec::with_capacity(cfg.workers);
        for worker in 0..cfg.workers {
            let counters = &counters;
            let delay = cfg.workload.delay_for(worker);
            let handle = thread::Builder::new()
                .name(format!("spin-shared-{worker}"))
                .spawn_scoped(s, move || {
                    clock.spin_shared(counters, cfg.workers, worker, delay)
                })
                .map_err(|source| CollectError::Spawn { worker, source })?;
            handles.push(handle);
        }
        for (worker, h) in handles.into_iter().enumerate() {
            h.join().map_err(|_| CollectError::WorkerPanicked(worker))?;
        }
        Ok(())
    })?;
    let counts = counters.into_iter().map(AtomicU64::into_inner).collect();
    Ok(OccupancyGrid::from_row_major(cfg.bins, cfg.workers, counts)?)
}

fn collect_channels(cfg: &CollectConfig) -> Result<OccupancyGrid, CollectError> {
    let (tx, rx) = unbounded::<(usize, Vec<u64>)>();
    let clock = SpinClock {
        t_ref: Instant::now(),
        bin_size_ns: cfg.bin_size_ns,
        bins: cfg.bins,
    };
    let mut columns: Vec<Option<Vec<u64>>> = vec![None; cfg.workers];
    thread::scope(|s| -> Result<(), CollectError> {
        let mut handles = Vec::with_capacity(cfg.workers);
        for worker in 0..cfg.workers {
            let tx = tx.clone();
            let delay = cfg.workload.delay_for(worker);
            let handle = thread::Builder::new()
                .name(format!("spin-channel-{worker}"))
                .spawn_scoped(s, move || {
                    let column = clock.spin_private(delay);
                    report_column(&tx, worker, column);
                })
                .map_err(|source| CollectError::Spawn { worker, source })?;
            handles.push(handle);
        }
        drop(tx);
        // Receive while workers finish, then join.
        for (worker, column) in rx.iter() {
            log::debug!(
                "worker {} reported {} iterations",
                worker,
                column.iter().sum::<u64>()
            );
            columns[worker] = Some(column);
        }
        for (worker, h) in handles.into_iter().enumerate() {
            h.join().map_err(|_| CollectError::WorkerPanicked(worker))?;
        }
        Ok(())
    })?;
    let columns = columns
        .into_iter()
        .enumerate()
        .map(|(worker, c)| c.ok_or(CollectError::WorkerLost(worker)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(OccupancyGrid::from_columns(&columns)?)
}

/// Sends one worker's column to the collector. Returns false if nobody is listening.
fn report_column(tx: &Sender<(usize, Vec<u64>)>, worker: usize, column: Vec<u64>) -> bool {
    match tx.send((worker, column)) {
        Ok(()) => true,
        Err(_) => {
            log::warn!("worker {} could not report its counts: receiver gone", worker);
            false
        }
    }
}

fn collect_pool(cfg: &CollectConfig) -> Result<OccupancyGrid, CollectError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(cfg.workers)
        .thread_name(|i| format!("spin-pool-{i}"))
        .build()?;
    let clock = SpinClock {
        t_ref: Instant::now(),
        bin_size_ns: cfg.bin_size_ns,
        bins: cfg.bins,
    };
    let workload = cfg.workload;
    let columns: Vec<Vec<u64>> = pool.install(|| {
        (0..cfg.workers)
            .into_par_iter()
            .map(|worker| clock.spin_private(workload.delay_for(worker)))
            .collect()
    });
    Ok(OccupancyGrid::from_columns(&columns)?)
}
