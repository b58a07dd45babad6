//! Renderers consuming timeline frames.

#[cfg(feature = "gui")]
pub mod gui;
pub mod text;

use std::io;

use spinbench_timeline::Frame;

pub trait Renderer {
    fn draw(&mut self, frames: &[Frame<'_>]) -> io::Result<()>;
}

/// Maps a timeline position to a cell or pixel column in `[0, width)`.
#[inline]
pub(crate) fn time_to_col(t: f64, duration: f64, width: usize) -> usize {
    if width == 0 || duration <= 0.0 {
        return 0;
    }
    let col = (t / duration * width as f64).floor();
    (col.max(0.0) as usize).min(width - 1)
}
