use std::sync::Arc;

use crate::animation::clip::AnimationClip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
}

/// One animation clip bound to a blend weight, a time scale and a pause flag.
///
/// Several actions may be enabled at once; their weighted outputs are summed
/// by the sampling backend. The action itself only keeps the playback
/// bookkeeping consistent.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,
    pub playing: bool,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            playing: false,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Core logic: advance time by `dt * time_scale`, wrapping at the clip
    /// duration. Returns `true` when a `Loop`-mode action completed a full
    /// cycle this tick.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.paused || !self.enabled || !self.playing {
            return false;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return false;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                // Play once, stop at end or start
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
                false
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                    true
                } else if self.time < 0.0 {
                    // Reverse playback wraps from the far end
                    self.time = duration + (self.time % duration);
                    true
                } else {
                    false
                }
            }
        }
    }
}
