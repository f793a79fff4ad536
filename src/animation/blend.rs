use crate::animation::mixer::{ActionHandle, AnimationMixer, LoopEvents};
use crate::errors::{Result, WaltzError};

/// A crossfade that waits for its source action to finish the current loop.
#[derive(Debug, Clone, Copy)]
struct PendingCrossFade {
    from: ActionHandle,
    to: ActionHandle,
    duration: f32,
}

/// Orchestrates blend weights and transitions over a fixed set of actions.
///
/// The controller never computes the blend itself; it keeps the per-action
/// weight/enabled/paused bookkeeping consistent and tells the mixer when to
/// fade. Transitions away from the designated base action start immediately,
/// every other transition is deferred to the source clip's next loop
/// boundary so it never starts mid-cycle.
///
/// Constructed once assets are ready; the action set never changes
/// afterwards, only its weights and flags do.
pub struct BlendController {
    actions: Vec<ActionHandle>,
    base: ActionHandle,

    single_step: bool,
    pending_step_size: f32,

    pending: Option<PendingCrossFade>,

    /// Effective weights read back after the last update, for display only.
    weights: Vec<f32>,
}

impl BlendController {
    /// `actions` is the ordered action set (the first entry is the
    /// reference action for pause-state decisions), `base` the steady-state
    /// anchor from which transitions may start at any point.
    pub fn new(mixer: &AnimationMixer, actions: Vec<ActionHandle>, base: ActionHandle) -> Result<Self> {
        for &handle in actions.iter().chain(std::iter::once(&base)) {
            if !mixer.contains(handle) {
                return Err(WaltzError::UnknownAction(format!("{handle:?}")));
            }
        }
        let count = actions.len();
        Ok(Self {
            actions,
            base,
            single_step: false,
            pending_step_size: 0.0,
            pending: None,
            weights: vec![0.0; count],
        })
    }

    #[must_use]
    pub fn actions(&self) -> &[ActionHandle] {
        &self.actions
    }

    #[must_use]
    pub fn base(&self) -> ActionHandle {
        self.base
    }

    #[must_use]
    pub fn single_step(&self) -> bool {
        self.single_step
    }

    /// Weight snapshot taken by the last [`per_frame_update`](Self::per_frame_update),
    /// ordered like [`actions`](Self::actions).
    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Enables the action, resets its time scale to 1 (cancelling any
    /// crossfade-driven warp still in effect) and applies the given weight.
    pub fn set_weight(&self, mixer: &mut AnimationMixer, handle: ActionHandle, weight: f32) {
        if let Some(action) = mixer.action_mut(handle) {
            action.enabled = true;
        }
        mixer.set_time_scale(handle, 1.0);
        mixer.set_weight(handle, weight);
    }

    /// Applies one initial weight per action, then starts playback of every
    /// action. Zero-weight actions keep playing silently so later
    /// transitions can fade them back in without a restart.
    pub fn activate_all(&self, mixer: &mut AnimationMixer, weights: &[f32]) {
        for (&handle, &weight) in self.actions.iter().zip(weights) {
            self.set_weight(mixer, handle, weight);
        }
        for &handle in &self.actions {
            mixer.play(handle);
        }
    }

    /// Stops every action unconditionally.
    pub fn deactivate_all(&self, mixer: &mut AnimationMixer) {
        for &handle in &self.actions {
            mixer.stop(handle);
        }
    }

    /// Cycles {Playing, Paused, SingleStep}: single-step mode exits straight
    /// to playing, otherwise the whole set pauses or unpauses together. The
    /// first action of the set is the reference for the current state.
    pub fn pause_toggle(&mut self, mixer: &mut AnimationMixer) {
        if self.single_step {
            self.single_step = false;
            self.pending_step_size = 0.0;
            mixer.unpause_all();
        } else if self
            .actions
            .first()
            .and_then(|&h| mixer.action(h))
            .is_some_and(|a| a.paused)
        {
            mixer.unpause_all();
        } else {
            mixer.pause_all();
        }
    }

    /// Arms single-step mode: the next frame advances by exactly
    /// `step_size`, subsequent frames freeze until re-armed or until
    /// [`pause_toggle`](Self::pause_toggle) exits the mode.
    pub fn enter_single_step(&mut self, mixer: &mut AnimationMixer, step_size: f32) {
        mixer.unpause_all();
        self.single_step = true;
        self.pending_step_size = step_size;
    }

    /// Requests a transition between two distinct tracked actions. The
    /// duration must already be resolved by the caller (default vs custom).
    ///
    /// Leaving the base action starts the fade immediately; leaving any
    /// other action defers it to that action's next loop completion. Only
    /// one deferred transition is kept: a newer request replaces a pending
    /// one (last request wins). Issuing any request exits single-step mode
    /// and unpauses the whole set.
    pub fn request_cross_fade(
        &mut self,
        mixer: &mut AnimationMixer,
        from: ActionHandle,
        to: ActionHandle,
        duration: f32,
    ) -> Result<()> {
        if from == to {
            return Err(WaltzError::DegenerateCrossFade);
        }
        if duration < 0.0 {
            return Err(WaltzError::InvalidDuration(duration));
        }
        for handle in [from, to] {
            if !self.actions.contains(&handle) {
                return Err(WaltzError::UnknownAction(format!("{handle:?}")));
            }
        }

        // A transition cannot sensibly be single-stepped.
        self.single_step = false;
        self.pending_step_size = 0.0;
        mixer.unpause_all();

        if from == self.base {
            self.execute_cross_fade(mixer, from, to, duration)?;
        } else {
            log::debug!("deferring crossfade until source action finishes its loop");
            self.pending = Some(PendingCrossFade { from, to, duration });
        }
        Ok(())
    }

    /// Drops a deferred crossfade keyed on `from`, if one is armed.
    pub fn cancel_pending_cross_fade(&mut self, from: ActionHandle) {
        if self.pending.is_some_and(|p| p.from == from) {
            self.pending = None;
        }
    }

    #[must_use]
    pub fn has_pending_cross_fade(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts the fade now: the target restarts from its beginning at full
    /// weight and the mixer interpolates the overlap with time-scale
    /// warping. A zero duration switches instantly.
    pub fn execute_cross_fade(
        &self,
        mixer: &mut AnimationMixer,
        from: ActionHandle,
        to: ActionHandle,
        duration: f32,
    ) -> Result<()> {
        self.set_weight(mixer, to, 1.0);
        mixer.set_time(to, 0.0);
        mixer.cross_fade(from, to, duration, true)
    }

    /// Per-frame tick. The effective delta is the pending step size while
    /// single-step mode is active (consumed once, then zero), otherwise the
    /// real elapsed time. After delegating to the mixer, a deferred
    /// crossfade whose source just wrapped is executed on this same frame,
    /// and the weight snapshot is refreshed.
    pub fn per_frame_update(&mut self, mixer: &mut AnimationMixer, delta: f32) -> Result<()> {
        let dt = if self.single_step {
            std::mem::replace(&mut self.pending_step_size, 0.0)
        } else {
            delta
        };

        let events = mixer.update(dt);
        self.fire_pending(mixer, &events)?;

        for (slot, &handle) in self.weights.iter_mut().zip(&self.actions) {
            *slot = mixer.weight(handle);
        }
        Ok(())
    }

    fn fire_pending(&mut self, mixer: &mut AnimationMixer, events: &LoopEvents) -> Result<()> {
        let Some(pending) = self.pending else {
            return Ok(());
        };
        if events.contains(&pending.from) {
            self.pending = None;
            self.execute_cross_fade(mixer, pending.from, pending.to, pending.duration)?;
        }
        Ok(())
    }
}
