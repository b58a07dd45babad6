//! Playback cursor driving the timeline animation.

use crate::error::TimelineError;

/// Jump multiplier for manual navigation while paused (fine scrubbing).
pub const PAUSED_JUMP_SCALE: f64 = 3.0;
/// Jump multiplier for manual navigation while playing.
pub const RUNNING_JUMP_SCALE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Paused,
    /// Reached the end; only `reset` resumes automatic ticking.
    Stopped,
}

#[derive(Clone, Debug)]
pub struct PlaybackCursor {
    position: f64,
    step: f64,
    duration: f64,
    state: PlaybackState,
}

impl PlaybackCursor {
    pub fn new(duration_s: f64, step_s: f64) -> Result<Self, TimelineError> {
        if !(duration_s.is_finite() && duration_s > 0.0) {
            return Err(TimelineError::InvalidDuration(duration_s));
        }
        if !(step_s.is_finite() && step_s > 0.0) {
            return Err(TimelineError::InvalidStep(step_s));
        }
        Ok(Self {
            position: 0.0,
            step: step_s,
            duration: duration_s,
            state: PlaybackState::Running,
        })
    }

    /// Step that plays `duration_s` of timeline over `display_s` of wall time at one
    /// tick per `frame_s`.
    pub fn step_for(display_s: f64, frame_s: f64, duration_s: f64) -> f64 {
        let frames = display_s / frame_s;
        duration_s / frames
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    /// Manual navigation by a scaled step. Never changes the playback state.
    pub fn advance(&mut self, direction: Direction, paused: bool) -> f64 {
        let scale = if paused {
            PAUSED_JUMP_SCALE
        } else {
            RUNNING_JUMP_SCALE
        };
        let delta = self.step * scale;
        let next = match direction {
            Direction::Forward => self.position + delta,
            Direction::Backward => self.position - delta,
        };
        self.position = next.clamp(0.0, self.duration);
        self.position
    }

    /// Navigation scaled by the cursor's own pause state.
    pub fn jump(&mut self, direction: Direction) -> f64 {
        let paused = self.is_paused();
        self.advance(direction, paused)
    }

    /// Automatic per-frame advance. Returns the new position, or `None` when not running.
    pub fn tick(&mut self) -> Option<f64> {
        if self.state != PlaybackState::Running {
            return None;
        }
        let next = self.position + self.step;
        if next >= self.duration {
            self.position = self.duration;
            self.state = PlaybackState::Stopped;
            log::debug!(target: "playback", "reached end at {:.3}s", self.duration);
        } else {
            self.position = next.max(0.0);
        }
        Some(self.position)
    }

    pub fn toggle_pause(&mut self) -> PlaybackState {
        self.state = match self.state {
            PlaybackState::Running => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Running,
            PlaybackState::Stopped => PlaybackState::Stopped,
        };
        self.state
    }

    pub fn reset(&mut self) {
        self.position = 0.0;
        self.state = PlaybackState::Running;
    }

    /// Not-yet-elapsed region as `(start, width)`.
    #[inline]
    pub fn cover(&self) -> (f64, f64) {
        (self.position, self.duration - self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12
    }

    #[test]
    fn paused_forward_jump_uses_fine_scale() {
        let mut c = PlaybackCursor::new(1.0, 0.1).unwrap();
        c.advance(Direction::Forward, true);
        assert!(approx(c.position(), 0.3));
        c.position = 0.5;
        assert!(approx(c.advance(Direction::Forward, true), 0.8));
        assert_eq!(c.advance(Direction::Forward, true), 1.0);
        assert_eq!(c.advance(Direction::Forward, true), 1.0);
    }

    #[test]
    fn running_jump_uses_coarse_scale_and_clamps_at_zero() {
        let mut c = PlaybackCursor::new(5.0, 0.1).unwrap();
        assert!(approx(c.advance(Direction::Forward, false), 1.0));
        assert_eq!(c.advance(Direction::Backward, false), 0.0);
        assert_eq!(c.advance(Direction::Backward, true), 0.0);
        assert_eq!(c.state(), PlaybackState::Running);
    }

    #[test]
    fn tick_stops_at_end() {
        let mut c = PlaybackCursor::new(1.0, 0.4).unwrap();
        assert!(approx(c.tick().unwrap(), 0.4));
        assert!(approx(c.tick().unwrap(), 0.8));
        assert_eq!(c.tick(), Some(1.0));
        assert_eq!(c.state(), PlaybackState::Stopped);
        assert_eq!(c.tick(), None);
        assert_eq!(c.position(), 1.0);
    }

    #[test]
    fn pause_toggles_and_blocks_ticks() {
        let mut c = PlaybackCursor::new(1.0, 0.1).unwrap();
        assert_eq!(c.toggle_pause(), PlaybackState::Paused);
        assert_eq!(c.tick(), None);
        assert_eq!(c.position(), 0.0);
        assert!(approx(c.jump(Direction::Forward), 0.3));
        assert_eq!(c.state(), PlaybackState::Paused);
        assert_eq!(c.toggle_pause(), PlaybackState::Running);
    }

    #[test]
    fn stopped_cursor_navigates_but_only_reset_resumes() {
        let mut c = PlaybackCursor::new(1.0, 0.6).unwrap();
        c.tick();
        c.tick();
        assert_eq!(c.state(), PlaybackState::Stopped);
        assert_eq!(c.toggle_pause(), PlaybackState::Stopped);
        assert_eq!(c.jump(Direction::Backward), 0.0);
        assert_eq!(c.state(), PlaybackState::Stopped);
        assert_eq!(c.tick(), None);
        c.reset();
        assert_eq!(c.state(), PlaybackState::Running);
        assert!(approx(c.tick().unwrap(), 0.6));
    }

    #[test]
    fn cover_spans_remaining_time() {
        let mut c = PlaybackCursor::new(2.0, 0.5).unwrap();
        c.tick();
        assert_eq!(c.cover(), (0.5, 1.5));
    }

    #[test]
    fn step_matches_display_pacing() {
        // 1s of data over 15s at 16ms frames.
        let step = PlaybackCursor::step_for(15.0, 0.016, 1.0);
        assert!(approx(step, 0.016 / 15.0));
        assert!(PlaybackCursor::new(1.0, 0.0).is_err());
        assert!(PlaybackCursor::new(0.0, 0.1).is_err());
    }
}
