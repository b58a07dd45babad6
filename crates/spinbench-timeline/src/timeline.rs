use spinbench_grid::OccupancyGrid;

use crate::config::TimelineConfig;
use crate::error::TimelineError;
use crate::histogram::HistogramAggregator;
use crate::interval::{Interval, IntervalBuilder};
use crate::palette::Rgb;
use crate::playback::{Direction, PlaybackCursor, PlaybackState};

const DEFAULT_ROW_LABEL: &str = "Worker";

/// Everything a renderer needs to draw one chart at the current cursor.
#[derive(Clone, Debug)]
pub struct Frame<'a> {
    pub title: &'a str,
    /// Label for the worker-row axis, e.g. "Thread".
    pub row_label: &'a str,
    pub intervals: &'a [Interval],
    pub counts: Vec<u64>,
    pub colors: &'a [Rgb],
    pub cursor: f64,
    /// `(start, width)` of the mask over the not-yet-played region.
    pub cover: (f64, f64),
    /// Worker rows plus the reserved row 0.
    pub rows: usize,
    pub duration: f64,
}

/// One collected run: its grid, the reduced intervals and its playback cursor.
pub struct Timeline {
    title: String,
    row_label: String,
    grid: OccupancyGrid,
    config: TimelineConfig,
    intervals: Vec<Interval>,
    histogram: HistogramAggregator,
    cursor: PlaybackCursor,
}

impl Timeline {
    pub fn new(
        title: impl Into<String>,
        grid: OccupancyGrid,
        config: TimelineConfig,
        step_s: f64,
    ) -> Result<Self, TimelineError> {
        let title = title.into();
        let builder = IntervalBuilder::new(config)?;
        let (intervals, report) = builder.build_with_report(&grid)?;
        let config = builder.config().clone();
        let histogram = HistogramAggregator::new(config.bin_size_ns, config.worker_count)?;
        let cursor = PlaybackCursor::new(config.duration_s, step_s)?;
        log::info!(
            "{}: merge {} -> {} spans, zero filter -> {} intervals",
            title,
            report.cells,
            report.merged,
            report.kept
        );
        Ok(Self {
            title,
            row_label: DEFAULT_ROW_LABEL.to_owned(),
            grid,
            config,
            intervals,
            histogram,
            cursor,
        })
    }

    /// Replaces the worker-row axis label.
    pub fn with_row_label(mut self, label: impl Into<String>) -> Self {
        self.row_label = label.into();
        self
    }

    #[inline]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    #[inline]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    #[inline]
    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    #[inline]
    pub fn cursor_mut(&mut self) -> &mut PlaybackCursor {
        &mut self.cursor
    }

    pub fn frame(&self) -> Result<Frame<'_>, TimelineError> {
        let counts = self
            .histogram
            .cumulative_counts(&self.grid, self.cursor.position())?;
        Ok(Frame {
            title: &self.title,
            row_label: &self.row_label,
            intervals: &self.intervals,
            counts,
            colors: &self.config.colors,
            cursor: self.cursor.position(),
            cover: self.cursor.cover(),
            rows: self.config.worker_count + 1,
            duration: self.config.duration_s,
        })
    }
}

/// Several timelines played in lockstep; input applies to all of them.
#[derive(Default)]
pub struct TimelineSet {
    timelines: Vec<Timeline>,
}

impl TimelineSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, timeline: Timeline) {
        self.timelines.push(timeline);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timeline> {
        self.timelines.iter()
    }

    /// Advances every running cursor one frame. Returns true if any moved.
    pub fn tick(&mut self) -> bool {
        let mut moved = false;
        for t in &mut self.timelines {
            moved |= t.cursor.tick().is_some();
        }
        moved
    }

    pub fn toggle_pause(&mut self) {
        for t in &mut self.timelines {
            let state = t.cursor.toggle_pause();
            log::info!(target: "playback", "{}: {:?}", t.title, state);
        }
    }

    pub fn jump(&mut self, direction: Direction) {
        for t in &mut self.timelines {
            let pos = t.cursor.jump(direction);
            log::debug!(
                target: "playback",
                "{}: {:?} -> {:.4}s",
                t.title,
                direction,
                pos
            );
        }
    }

    pub fn restart(&mut self) {
        for t in &mut self.timelines {
            t.cursor.reset();
        }
        log::info!(
            target: "playback",
            "restarted {} timelines",
            self.timelines.len()
        );
    }

    pub fn is_paused(&self) -> bool {
        self.timelines.iter().any(|t| t.cursor.is_paused())
    }

    /// True once every cursor has run to the end.
    pub fn is_finished(&self) -> bool {
        self.timelines
            .iter()
            .all(|t| t.cursor.state() == PlaybackState::Stopped)
    }

    pub fn frames(&self) -> Result<Vec<Frame<'_>>, TimelineError> {
        self.timelines.iter().map(Timeline::frame).collect()
    }
}
