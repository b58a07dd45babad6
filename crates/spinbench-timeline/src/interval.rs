//! Reduction of the occupancy grid into merged, drawable intervals.

use spinbench_grid::OccupancyGrid;

use crate::config::{TimelineConfig, WIDTH_EPSILON};
use crate::error::TimelineError;
use crate::fill::{bin_start_s, fill_lengths};
use crate::palette::Rgb;

/// One drawable bar: `[start, start + width)` on row `row`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub width: f64,
    /// `worker + 1`; row 0 is left empty.
    pub row: usize,
    pub color: Rgb,
}

impl Interval {
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    #[inline]
    pub fn worker(&self) -> usize {
        self.row - 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Span {
    x0: f64,
    width: f64,
}

/// Fold accumulator for one worker's merge pass.
struct MergeState {
    spans: Vec<Span>,
    prev_fill: f64,
}

/// Sizes at each reduction stage, for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Raw (bin, worker) cells.
    pub cells: usize,
    /// Spans after merging, before the zero-width filter.
    pub merged: usize,
    /// Intervals handed to the renderer.
    pub kept: usize,
}

#[derive(Clone, Debug)]
pub struct IntervalBuilder {
    cfg: TimelineConfig,
    threshold_s: f64,
}

impl IntervalBuilder {
    pub fn new(cfg: TimelineConfig) -> Result<Self, TimelineError> {
        cfg.validate()?;
        let threshold_s = cfg.merge_threshold * cfg.bin_size_s();
        Ok(Self { cfg, threshold_s })
    }

    #[inline]
    pub fn config(&self) -> &TimelineConfig {
        &self.cfg
    }

    pub fn build(&self, grid: &OccupancyGrid) -> Result<Vec<Interval>, TimelineError> {
        self.build_with_report(grid).map(|(intervals, _)| intervals)
    }

    pub fn build_with_report(
        &self,
        grid: &OccupancyGrid,
    ) -> Result<(Vec<Interval>, BuildReport), TimelineError> {
        self.cfg.check_grid(grid)?;
        let mut intervals = Vec::new();
        let mut merged = 0usize;
        for worker in 0..self.cfg.worker_count {
            let counts: Vec<u64> = grid.column(worker).collect();
            let fills = fill_lengths(
                &counts,
                self.cfg.bin_size_ns,
                self.cfg.avg_iteration_ns,
                self.cfg.fill_mode,
            );
            let spans = self.merge_worker(&fills);
            merged += spans.len();
            let color = self.cfg.colors[worker];
            intervals.extend(
                spans
                    .into_iter()
                    .filter(|s| s.width > WIDTH_EPSILON)
                    .map(|s| Interval {
                        start: s.x0,
                        width: s.width,
                        row: worker + 1,
                        color,
                    }),
            );
        }
        let report = BuildReport {
            cells: grid.bins() * grid.workers(),
            merged,
            kept: intervals.len(),
        };
        log::debug!(
            "interval merge: {} cells -> {} spans -> {} intervals",
            report.cells,
            report.merged,
            report.kept
        );
        Ok((intervals, report))
    }

    /// Greedy forward merge keyed on the previous bin's fullness, then end clamp.
    fn merge_worker(&self, fills: &[f64]) -> Vec<Span> {
        let bin_ns = self.cfg.bin_size_ns;
        let Some(&first) = fills.first() else {
            return Vec::new();
        };
        let init = MergeState {
            spans: vec![Span {
                x0: bin_start_s(0, bin_ns),
                width: first,
            }],
            prev_fill: first,
        };
        let MergeState { mut spans, .. } =
            fills
                .iter()
                .enumerate()
                .skip(1)
                .fold(init, |mut st, (bin, &fill)| {
                    let x = bin_start_s(bin, bin_ns);
                    if st.prev_fill > self.threshold_s {
                        if let Some(cur) = st.spans.last_mut() {
                            cur.width = x + fill - cur.x0;
                        }
                    } else if fill > WIDTH_EPSILON {
                        st.spans.push(Span { x0: x, width: fill });
                    }
                    st.prev_fill = fill;
                    st
                });
        if let Some(last) = spans.last_mut() {
            if last.x0 + last.width > self.cfg.duration_s {
                last.width = clamp_width(last.x0, self.cfg.duration_s);
            }
        }
        spans
    }
}

/// Largest non-negative width with `x0 + width <= end` in floating point.
fn clamp_width(x0: f64, end: f64) -> f64 {
    let mut width = (end - x0).max(0.0);
    while width > 0.0 && x0 + width > end {
        width = f64::from_bits(width.to_bits() - 1);
    }
    width
}
