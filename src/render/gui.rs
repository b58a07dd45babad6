use std::error::Error;

use raylib::prelude::*;
use spinbench_timeline::{Direction, Frame, TimelineSet};

use super::time_to_col;

const MARGIN: i32 = 12;
const TITLE_FONT: i32 = 16;
const LABEL_FONT: i32 = 12;
const BACKGROUND: Color = Color::new(0, 0, 0, 255);
const AXIS: Color = Color::new(90, 90, 90, 255);
const PLAYHEAD: Color = Color::new(230, 40, 40, 255);

fn rl_color(c: spinbench_timeline::Rgb) -> Color {
    Color::new(c.r, c.g, c.b, 255)
}

/// Interactive viewer: space pauses, left/right scrub, R restarts.
pub fn run(set: &mut TimelineSet, frame_ms: u64) -> Result<(), Box<dyn Error>> {
    let (mut rl, thread) = raylib::init()
        .size(1280, 220 * set.len().max(1) as i32)
        .resizable()
        .title("spinbench")
        .build();
    rl.set_target_fps((1000 / frame_ms.max(1)).max(1) as u32);

    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            set.toggle_pause();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            set.jump(Direction::Backward);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            set.jump(Direction::Forward);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            set.restart();
        }
        set.tick();

        let frames = set.frames()?;
        let sw = rl.get_screen_width();
        let sh = rl.get_screen_height();
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(BACKGROUND);
        let chart_h = sh / frames.len().max(1) as i32;
        for (i, f) in frames.iter().enumerate() {
            let top = i as i32 * chart_h;
            let bars_w = (sw * 3) / 4;
            draw_timeline(
                &mut d,
                f,
                MARGIN,
                top + MARGIN,
                bars_w - 2 * MARGIN,
                chart_h - 2 * MARGIN,
            );
            draw_histogram(
                &mut d,
                f,
                bars_w + MARGIN,
                top + MARGIN,
                sw - bars_w - 2 * MARGIN,
                chart_h - 2 * MARGIN,
            );
        }
        if set.is_paused() {
            d.draw_text("PAUSED", sw - 90, MARGIN, TITLE_FONT, Color::RAYWHITE);
        }
    }
    Ok(())
}

fn draw_timeline(d: &mut impl RaylibDraw, f: &Frame<'_>, x: i32, y: i32, w: i32, h: i32) {
    d.draw_text(f.title, x, y, TITLE_FONT, Color::RAYWHITE);
    let top = y + TITLE_FONT + 4;
    let plot_h = (h - TITLE_FONT - 4 - LABEL_FONT - 4).max(1);
    let row_h = (plot_h as f32 / f.rows as f32).max(1.0);
    let width = w.max(1) as usize;
    for iv in f.intervals {
        let x0 = x + time_to_col(iv.start, f.duration, width) as i32;
        let x1 = x + time_to_col(iv.end(), f.duration, width) as i32;
        // rows grow upward from the bottom axis; row 0 stays empty
        let ry = top + plot_h - ((iv.row as f32 + 0.5) * row_h) as i32;
        let bar_h = row_h.max(1.0) as i32;
        d.draw_rectangle(x0, ry, (x1 - x0).max(1), bar_h, rl_color(iv.color));
    }
    let (cover_start, _) = f.cover;
    let cx = x + time_to_col(cover_start, f.duration, width) as i32;
    if cover_start < f.duration {
        d.draw_rectangle(cx, top, x + w - cx, plot_h, BACKGROUND);
        d.draw_line(cx, top, cx, top + plot_h, PLAYHEAD);
    }
    d.draw_line(x, top + plot_h, x + w, top + plot_h, AXIS);
    d.draw_text(f.row_label, x, top, LABEL_FONT, AXIS);
    let label = format!("{:.3} s / {:.3} s", f.cursor, f.duration);
    d.draw_text(&label, x, top + plot_h + 4, LABEL_FONT, AXIS);
}

fn draw_histogram(d: &mut impl RaylibDraw, f: &Frame<'_>, x: i32, y: i32, w: i32, h: i32) {
    let top = y + TITLE_FONT + 4;
    let plot_h = (h - TITLE_FONT - 4 - LABEL_FONT - 4).max(1);
    let n = f.counts.len().max(1) as i32;
    let slot = (w / n).max(1);
    let max = f.counts.iter().copied().max().unwrap_or(0).max(1);
    d.draw_text("Iterations", x, y, TITLE_FONT, Color::RAYWHITE);
    for (worker, &count) in f.counts.iter().enumerate() {
        let bar_h = (count as f64 / max as f64 * plot_h as f64) as i32;
        let bx = x + worker as i32 * slot;
        let color = f
            .colors
            .get(worker)
            .copied()
            .map(rl_color)
            .unwrap_or(AXIS);
        let bar_w = (slot - 4).max(1);
        d.draw_rectangle(bx + 2, top + plot_h - bar_h, bar_w, bar_h, color);
        let label = format!("{}", worker + 1);
        d.draw_text(&label, bx + slot / 2 - 3, top + plot_h + 4, LABEL_FONT, AXIS);
    }
    d.draw_line(x, top + plot_h, x + w, top + plot_h, AXIS);
}
