/// What happens when an action reaches the end of its clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Wrap around and play again.
    #[default]
    Repeat,
    /// Stop on the last frame.
    Once,
}

/// A clip being played by an [`AnimationMixer`](crate::animation::AnimationMixer).
#[derive(Clone, Debug, PartialEq)]
pub struct ClipAction {
    /// Index of the clip in the mixer.
    pub clip: usize,
    /// Local time, in seconds, within `[0, duration]`.
    pub time: f32,
    /// Multiplier applied to every time step. Negative values play backwards.
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    finished: bool,
}

impl ClipAction {
    /// A looping action at time 0.
    pub fn new(clip: usize) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Repeat,
            paused: false,
            finished: false,
        }
    }

    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Whether a [`LoopMode::Once`] action reached its end.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Moves the local time forward by `delta` seconds of a clip lasting `duration` seconds.
    pub fn advance(&mut self, delta: f32, duration: f32) {
        if self.paused || self.finished {
            return;
        }

        if duration <= 0.0 {
            self.time = 0.0;
            return;
        }

        let step = delta * self.time_scale;
        if !step.is_finite() {
            return;
        }

        let time = self.time + step;
        match self.loop_mode {
            LoopMode::Repeat => self.time = time.rem_euclid(duration),
            LoopMode::Once => {
                self.time = time.clamp(0.0, duration);
                self.finished = time >= duration || (time <= 0.0 && self.time_scale < 0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_wraps_around() {
        let mut action = ClipAction::new(0);
        action.advance(2.5, 1.0);
        assert!((action.time - 0.5).abs() < 1.0e-6);
        assert!(!action.is_finished());
    }

    #[test]
    fn once_clamps_and_finishes() {
        let mut action = ClipAction::new(0).with_loop_mode(LoopMode::Once);
        action.advance(0.4, 1.0);
        assert!(!action.is_finished());
        action.advance(1.0, 1.0);
        assert_eq!(action.time, 1.0);
        assert!(action.is_finished());
        action.advance(1.0, 1.0);
        assert_eq!(action.time, 1.0);
    }

    #[test]
    fn empty_clips_keep_time_at_zero() {
        let mut action = ClipAction::new(0);
        action.advance(3.0, 0.0);
        assert_eq!(action.time, 0.0);
        assert!(action.time.is_finite());
    }

    #[test]
    fn paused_actions_do_not_move() {
        let mut action = ClipAction::new(0);
        action.paused = true;
        action.advance(0.3, 1.0);
        assert_eq!(action.time, 0.0);
    }

    #[test]
    fn non_finite_steps_are_ignored() {
        let mut action = ClipAction::new(0);
        action.advance(0.25, 1.0);
        action.time_scale = f32::NAN;
        action.advance(0.25, 1.0);
        assert!((action.time - 0.25).abs() < 1.0e-6);

        action.time_scale = 1.0;
        action.advance(f32::INFINITY, 1.0);
        assert!((action.time - 0.25).abs() < 1.0e-6);
    }

    #[test]
    fn time_scale_applies() {
        let mut action = ClipAction::new(0);
        action.time_scale = -1.0;
        action.advance(0.25, 1.0);
        assert!((action.time - 0.75).abs() < 1.0e-6);
    }
}
