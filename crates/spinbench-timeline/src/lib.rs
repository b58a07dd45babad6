//! Timeline reduction: merged activity intervals, cumulative histograms and playback.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod fill;
pub mod histogram;
pub mod interval;
pub mod palette;
pub mod playback;
pub mod timeline;

pub use config::{DEFAULT_MERGE_THRESHOLD, FillMode, NS_PER_SEC, TimelineConfig, WIDTH_EPSILON};
pub use error::TimelineError;
pub use histogram::HistogramAggregator;
pub use interval::{BuildReport, Interval, IntervalBuilder};
pub use palette::{Rgb, random_palette, resolve_palette};
pub use playback::{Direction, PlaybackCursor, PlaybackState};
pub use spinbench_grid::OccupancyGrid;
pub use timeline::{Frame, Timeline, TimelineSet};
