use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use spinbench_collect::{Strategy, Workload};
use spinbench_timeline::{DEFAULT_MERGE_THRESHOLD, FillMode, Rgb};

#[derive(Clone, Debug, Deserialize)]
pub struct BenchConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Length of each collection run, in seconds.
    #[serde(default = "default_duration_s")]
    pub duration_s: f64,
    #[serde(default = "default_bin_size_ns")]
    pub bin_size_ns: u64,
    /// Wall-clock seconds the playback of one run should take.
    #[serde(default = "default_display_s")]
    pub display_s: f64,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default)]
    pub fill_mode: FillMode,
    #[serde(default = "default_merge_threshold")]
    pub merge_threshold: f64,
    /// Per-worker colors as `[r, g, b]`; generated when absent.
    #[serde(default)]
    pub colors: Option<Vec<Rgb>>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_runs")]
    pub runs: Vec<RunConfig>,
}

fn default_workers() -> usize {
    4
}
fn default_duration_s() -> f64 {
    1.0
}
fn default_bin_size_ns() -> u64 {
    200_000
}
fn default_display_s() -> f64 {
    15.0
}
fn default_frame_ms() -> u64 {
    16
}
fn default_merge_threshold() -> f64 {
    DEFAULT_MERGE_THRESHOLD
}
fn default_runs() -> Vec<RunConfig> {
    vec![
        RunConfig::cpu(Strategy::Threads),
        RunConfig::cpu(Strategy::Channels),
    ]
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            duration_s: default_duration_s(),
            bin_size_ns: default_bin_size_ns(),
            display_s: default_display_s(),
            frame_ms: default_frame_ms(),
            fill_mode: FillMode::default(),
            merge_threshold: default_merge_threshold(),
            colors: None,
            seed: None,
            runs: default_runs(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    #[default]
    Cpu,
    Io,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    pub strategy: Strategy,
    #[serde(default)]
    pub workload: WorkloadKind,
    #[serde(default = "default_io_delay_ms")]
    pub io_delay_ms: u64,
}

fn default_io_delay_ms() -> u64 {
    100
}

impl RunConfig {
    pub fn cpu(strategy: Strategy) -> Self {
        Self {
            strategy,
            workload: WorkloadKind::Cpu,
            io_delay_ms: default_io_delay_ms(),
        }
    }

    pub fn workload(&self) -> Workload {
        match self.workload {
            WorkloadKind::Cpu => Workload::Cpu,
            WorkloadKind::Io => Workload::MixedIo {
                delay: Duration::from_millis(self.io_delay_ms),
            },
        }
    }
}

impl BenchConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BenchConfig = toml::from_str(text)?;
        Ok(cfg)
    }

    #[inline]
    pub fn frame_s(&self) -> f64 {
        self.frame_ms as f64 / 1e3
    }

    /// Basic sanity checks the timeline builders do not cover.
    pub fn check(&self) -> Result<(), Box<dyn Error>> {
        if self.runs.is_empty() {
            return Err("no runs configured".into());
        }
        if self.frame_ms == 0 {
            return Err("frame_ms must be positive".into());
        }
        if !(self.display_s.is_finite() && self.display_s > 0.0) {
            return Err(format!("display_s must be positive (got {})", self.display_s).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = BenchConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.bin_size_ns, 200_000);
        assert_eq!(cfg.merge_threshold, 0.9);
        assert_eq!(cfg.fill_mode, FillMode::Partial);
        assert_eq!(cfg.runs, default_runs());
        assert!(cfg.check().is_ok());
    }

    #[test]
    fn parses_runs_colors_and_modes() {
        let cfg = BenchConfig::from_toml_str(
            r#"
            workers = 2
            fill_mode = "full-then-partial"
            colors = [[255, 0, 0], [0, 255, 16]]
            seed = 9

            [[runs]]
            strategy = "pool"

            [[runs]]
            strategy = "channels"
            workload = "io"
            io_delay_ms = 20
        "#,
        )
        .unwrap();
        assert_eq!(cfg.workers, 2);
        assert_eq!(cfg.fill_mode, FillMode::FullThenPartial);
        assert_eq!(
            cfg.colors,
            Some(vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 16)])
        );
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.runs[0].workload(), Workload::Cpu);
        assert_eq!(
            cfg.runs[1].workload(),
            Workload::MixedIo {
                delay: Duration::from_millis(20)
            }
        );
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        assert!(BenchConfig::from_toml_str("[[runs]]\nstrategy = \"processes\"").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers = 3\nduration_s = 0.5").unwrap();
        let cfg = BenchConfig::load_from_path(file.path()).unwrap();
        assert_eq!(cfg.workers, 3);
        assert_eq!(cfg.duration_s, 0.5);
    }

    #[test]
    fn empty_run_list_fails_check() {
        let cfg = BenchConfig {
            runs: vec![],
            ..BenchConfig::default()
        };
        assert!(cfg.check().is_err());
    }
}
