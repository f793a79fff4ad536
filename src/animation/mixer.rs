use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::animation::action::AnimationAction;
use crate::animation::clip::AnimationClip;
use crate::errors::{Result, WaltzError};

new_key_type! {
    /// Strongly-typed identity of one action inside a mixer.
    pub struct ActionHandle;
}

/// Handles of the actions that completed a loop during one `update` tick.
pub type LoopEvents = SmallVec<[ActionHandle; 4]>;

/// Linear parameter ramp used for weight fades and time-scale warps.
#[derive(Debug, Clone, Copy)]
struct Ramp {
    target: ActionHandle,
    start: f32,
    end: f32,
    duration: f32,
    elapsed: f32,
}

impl Ramp {
    fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.end;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start + (self.end - self.start) * t
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Owns the fixed set of actions and advances them each frame.
///
/// The mixer is the playback engine of the crate: it accumulates time,
/// wraps it at clip boundaries, drives in-flight crossfade ramps and
/// reports loop completions to whoever asked for them.
pub struct AnimationMixer {
    actions: SlotMap<ActionHandle, AnimationAction>,
    fades: Vec<Ramp>,
    warps: Vec<Ramp>,

    /// Global playback speed, multiplied into every action's own scale.
    pub time_scale: f32,
}

impl Default for AnimationMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: SlotMap::with_key(),
            fades: Vec::new(),
            warps: Vec::new(),
            time_scale: 1.0,
        }
    }

    /// Binds a clip to a new action. The action set is fixed after loading;
    /// there is deliberately no removal API.
    pub fn add_clip(&mut self, clip: Arc<AnimationClip>) -> ActionHandle {
        self.actions.insert(AnimationAction::new(clip))
    }

    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    #[must_use]
    pub fn handles(&self) -> Vec<ActionHandle> {
        self.actions.keys().collect()
    }

    #[must_use]
    pub fn contains(&self, handle: ActionHandle) -> bool {
        self.actions.contains_key(handle)
    }

    /// Current blend weight of an action, 0.0 for a stale handle.
    #[must_use]
    pub fn weight(&self, handle: ActionHandle) -> f32 {
        self.actions.get(handle).map_or(0.0, |a| a.weight)
    }

    /// Sets an action's weight directly, cancelling any in-flight fade so
    /// the explicit value is not overwritten on the next tick.
    pub fn set_weight(&mut self, handle: ActionHandle, weight: f32) {
        self.fades.retain(|f| f.target != handle);
        if let Some(action) = self.actions.get_mut(handle) {
            action.weight = weight;
        }
    }

    /// Sets an action's time scale directly, cancelling any in-flight warp.
    pub fn set_time_scale(&mut self, handle: ActionHandle, time_scale: f32) {
        self.warps.retain(|w| w.target != handle);
        if let Some(action) = self.actions.get_mut(handle) {
            action.time_scale = time_scale;
        }
    }

    /// Rewinds an action to the given playback time.
    pub fn set_time(&mut self, handle: ActionHandle, time: f32) {
        if let Some(action) = self.actions.get_mut(handle) {
            action.time = time;
        }
    }

    pub fn play(&mut self, handle: ActionHandle) {
        if let Some(action) = self.actions.get_mut(handle) {
            action.playing = true;
        }
    }

    /// Stops an action and rewinds it to the beginning.
    pub fn stop(&mut self, handle: ActionHandle) {
        if let Some(action) = self.actions.get_mut(handle) {
            action.playing = false;
            action.time = 0.0;
        }
    }

    pub fn play_all(&mut self) {
        for action in self.actions.values_mut() {
            action.playing = true;
        }
    }

    pub fn stop_all(&mut self) {
        for action in self.actions.values_mut() {
            action.playing = false;
            action.time = 0.0;
        }
    }

    pub fn pause_all(&mut self) {
        for action in self.actions.values_mut() {
            action.paused = true;
        }
    }

    pub fn unpause_all(&mut self) {
        for action in self.actions.values_mut() {
            action.paused = false;
        }
    }

    /// Schedules a timed crossfade: `from`'s weight ramps from its current
    /// value down to 0 while `to` ramps from 0 up to 1 over `duration`
    /// seconds. With `warp` the per-action time scales are eased across the
    /// clip-duration ratio so the perceived speed stays continuous through
    /// the overlap. A zero duration applies the end state immediately.
    ///
    /// Scheduling replaces any fade or warp already in flight for either
    /// action.
    pub fn cross_fade(
        &mut self,
        from: ActionHandle,
        to: ActionHandle,
        duration: f32,
        warp: bool,
    ) -> Result<()> {
        let from_duration = self
            .actions
            .get(from)
            .ok_or_else(|| WaltzError::UnknownAction(format!("{from:?}")))?
            .clip()
            .duration;
        let to_duration = self
            .actions
            .get(to)
            .ok_or_else(|| WaltzError::UnknownAction(format!("{to:?}")))?
            .clip()
            .duration;

        let from_weight = self.weight(from);

        if duration <= 0.0 {
            self.set_weight(from, 0.0);
            self.set_weight(to, 1.0);
            self.set_time_scale(from, 1.0);
            self.set_time_scale(to, 1.0);
            return Ok(());
        }

        self.schedule_fade(from, from_weight, 0.0, duration);
        self.schedule_fade(to, 0.0, 1.0, duration);

        if warp && from_duration > 0.0 && to_duration > 0.0 {
            let start_end_ratio = from_duration / to_duration;
            let end_start_ratio = to_duration / from_duration;
            self.schedule_warp(from, 1.0, start_end_ratio, duration);
            self.schedule_warp(to, end_start_ratio, 1.0, duration);
        }

        Ok(())
    }

    fn schedule_fade(&mut self, target: ActionHandle, start: f32, end: f32, duration: f32) {
        self.fades.retain(|f| f.target != target);
        self.fades.push(Ramp {
            target,
            start,
            end,
            duration,
            elapsed: 0.0,
        });
    }

    fn schedule_warp(&mut self, target: ActionHandle, start: f32, end: f32, duration: f32) {
        self.warps.retain(|w| w.target != target);
        self.warps.push(Ramp {
            target,
            start,
            end,
            duration,
            elapsed: 0.0,
        });
    }

    /// Whether any crossfade ramp is still in flight.
    #[must_use]
    pub fn fading(&self) -> bool {
        !self.fades.is_empty()
    }

    /// Advances every playing action by `dt * time_scale * action.time_scale`
    /// and every in-flight ramp by the globally scaled delta. Returns the
    /// actions that wrapped around their clip this tick; the caller reacts
    /// on the same frame, there is no queuing.
    pub fn update(&mut self, dt: f32) -> LoopEvents {
        let scaled = dt * self.time_scale;

        let actions = &mut self.actions;
        self.fades.retain_mut(|fade| {
            fade.elapsed += scaled;
            if let Some(action) = actions.get_mut(fade.target) {
                action.weight = fade.value();
            }
            !fade.finished()
        });
        self.warps.retain_mut(|warp| {
            warp.elapsed += scaled;
            if let Some(action) = actions.get_mut(warp.target) {
                action.time_scale = warp.value();
            }
            !warp.finished()
        });

        let mut events = LoopEvents::new();
        for (handle, action) in &mut self.actions {
            if action.advance(scaled) {
                events.push(handle);
            }
        }
        events
    }
}
