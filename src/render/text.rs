use std::io::{self, Write};

use spinbench_timeline::Frame;

use super::{Renderer, time_to_col};

const HIST_WIDTH: usize = 40;

/// Plain-text charts: one line per worker row, then the cumulative histogram.
pub struct TextRenderer<W: Write> {
    out: W,
    columns: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, columns: usize) -> Self {
        Self {
            out,
            columns: columns.max(8),
        }
    }

    fn draw_frame(&mut self, f: &Frame<'_>) -> io::Result<()> {
        let w = self.columns;
        writeln!(
            self.out,
            "== {}  [{:.3}s / {:.3}s]",
            f.title, f.cursor, f.duration
        )?;
        let played = played_cols(f.cursor, f.duration, w);
        let playhead = (f.cursor < f.duration)
            .then(|| time_to_col(f.cursor, f.duration, w));
        writeln!(self.out, "    {}", f.row_label)?;
        for row in 1..f.rows {
            let mut cells = vec![b'.'; w];
            for iv in f.intervals.iter().filter(|i| i.row == row) {
                let c0 = time_to_col(iv.start, f.duration, w);
                let c1 = ((iv.end() / f.duration) * w as f64).ceil() as usize;
                for cell in &mut cells[c0..c1.clamp(c0 + 1, w)] {
                    *cell = b'#';
                }
            }
            for cell in &mut cells[played..] {
                *cell = b' ';
            }
            if let Some(p) = playhead {
                cells[p] = b'|';
            }
            writeln!(self.out, "{:>3} {}", row, String::from_utf8_lossy(&cells))?;
        }
        let max = f.counts.iter().copied().max().unwrap_or(0).max(1);
        for (worker, &count) in f.counts.iter().enumerate() {
            let len = (count as u128 * HIST_WIDTH as u128 / max as u128) as usize;
            writeln!(
                self.out,
                "{:>3} {:<width$} {}",
                worker + 1,
                "=".repeat(len),
                count,
                width = HIST_WIDTH
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, frames: &[Frame<'_>]) -> io::Result<()> {
        for f in frames {
            self.draw_frame(f)?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

/// Columns whose start lies before the cursor; the rest are still covered.
fn played_cols(cursor: f64, duration: f64, width: usize) -> usize {
    if cursor >= duration {
        width
    } else {
        ((cursor / duration) * width as f64).ceil().clamp(0.0, width as f64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinbench_timeline::{OccupancyGrid, Rgb, Timeline, TimelineConfig};

    fn timeline() -> Timeline {
        // 4 bins x 2 workers; worker 1 busy in bins 0-1, worker 2 only in bin 3.
        let grid = OccupancyGrid::from_row_major(4, 2, vec![10, 0, 10, 0, 0, 0, 0, 4]).unwrap();
        let colors = vec![Rgb::new(200, 0, 0), Rgb::new(0, 200, 0)];
        let cfg =
            TimelineConfig::new(250_000_000, 1.0, colors).with_avg_iteration_ns(25_000_000.0);
        Timeline::new("demo", grid, cfg, 0.25)
            .unwrap()
            .with_row_label("Thread")
    }

    fn render(t: &Timeline) -> String {
        let mut buf = Vec::new();
        TextRenderer::new(&mut buf, 8)
            .draw(&[t.frame().unwrap()])
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn finished_timeline_shows_all_bars() {
        let mut t = timeline();
        while t.cursor_mut().tick().is_some() {}
        let out = render(&t);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "== demo  [1.000s / 1.000s]");
        assert_eq!(lines[1], "    Thread");
        assert_eq!(lines[2], "  1 ####....");
        assert_eq!(lines[3], "  2 ......#.");
        assert!(lines[4].starts_with("  1 ====="));
        assert!(lines[4].ends_with(" 20"));
        assert!(lines[5].ends_with(" 4"));
    }

    #[test]
    fn unplayed_region_is_covered() {
        let mut t = timeline();
        t.cursor_mut().tick();
        let out = render(&t);
        let lines: Vec<&str> = out.lines().collect();
        // cursor at 0.25s: two columns played, playhead on column 2
        assert_eq!(lines[2], "  1 ##|     ");
        assert_eq!(lines[3], "  2 ..|     ");
    }
}
