use std::path::PathBuf;

use clap::Parser;
use spinbench_collect::Strategy;
use spinbench_timeline::FillMode;

use crate::config::{BenchConfig, RunConfig, WorkloadKind};

/// Compare how fast workers on different concurrency primitives can count,
/// then play the per-worker activity back as a timeline.
#[derive(Debug, Parser)]
#[command(name = "spinbench", version)]
pub struct Args {
    /// TOML config file; flags below override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Collection time per run, in seconds.
    #[arg(short, long)]
    pub duration: Option<f64>,

    #[arg(long)]
    pub bin_size_ns: Option<u64>,

    /// Runs to perform (threads, channels, pool). Repeatable; replaces configured runs.
    #[arg(short, long = "strategy")]
    pub strategies: Vec<Strategy>,

    /// Give the selected strategies the mixed IO workload.
    #[arg(long)]
    pub io: bool,

    /// partial or full-then-partial.
    #[arg(long)]
    pub fill_mode: Option<FillMode>,

    /// Seed for the generated worker palette.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop headless playback after this many frames.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Columns used for the terminal timeline.
    #[arg(long, default_value_t = 72)]
    pub columns: usize,

    /// Open the interactive viewer (requires the `gui` feature).
    #[arg(long)]
    pub gui: bool,

    /// Also write the log to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Applies command-line overrides on top of a loaded config.
    pub fn apply(&self, cfg: &mut BenchConfig) {
        if let Some(w) = self.workers {
            cfg.workers = w;
        }
        if let Some(d) = self.duration {
            cfg.duration_s = d;
        }
        if let Some(b) = self.bin_size_ns {
            cfg.bin_size_ns = b;
        }
        if let Some(m) = self.fill_mode {
            cfg.fill_mode = m;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if !self.strategies.is_empty() {
            let workload = if self.io {
                WorkloadKind::Io
            } else {
                WorkloadKind::Cpu
            };
            cfg.runs = self
                .strategies
                .iter()
                .map(|&strategy| RunConfig {
                    workload,
                    ..RunConfig::cpu(strategy)
                })
                .collect();
        } else if self.io {
            for run in &mut cfg.runs {
                run.workload = WorkloadKind::Io;
            }
        }
    }
}
