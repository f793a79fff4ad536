//! Blend Controller Tests
//!
//! Tests for:
//! - Weight/enable bookkeeping (set_weight, activate_all, deactivate_all)
//! - The Playing/Paused/SingleStep state machine
//! - Immediate crossfades out of the base action
//! - Deferred ("synchronized") crossfades out of non-base actions
//! - Pending-transition replacement and cancellation

use waltz::animation::{AnimationClip, AnimationMixer, BlendController};
use waltz::{ActionHandle, WaltzError};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

struct Rig {
    mixer: AnimationMixer,
    controller: BlendController,
    idle: ActionHandle,
    walk: ActionHandle,
    run: ActionHandle,
}

/// idle (2.0s) / walk (1.0s) / run (0.8s), walk is the base action.
fn rig() -> Rig {
    let mut mixer = AnimationMixer::new();
    let idle = mixer.add_clip(AnimationClip::new("idle", 2.0));
    let walk = mixer.add_clip(AnimationClip::new("walk", 1.0));
    let run = mixer.add_clip(AnimationClip::new("run", 0.8));

    let controller = BlendController::new(&mixer, vec![idle, walk, run], walk).unwrap();
    Rig {
        mixer,
        controller,
        idle,
        walk,
        run,
    }
}

// ============================================================================
// Weight bookkeeping
// ============================================================================

#[test]
fn set_weight_enables_and_resets_time_scale() {
    let Rig {
        mut mixer,
        controller,
        idle,
        ..
    } = rig();
    mixer.action_mut(idle).unwrap().enabled = false;
    mixer.set_time_scale(idle, 0.3);

    for w in [0.0_f32, 0.25, 0.5, 1.0] {
        controller.set_weight(&mut mixer, idle, w);
        let action = mixer.action(idle).unwrap();
        assert!(action.enabled);
        assert!(approx(action.time_scale, 1.0));
        assert!(approx(action.weight, w));
    }
}

#[test]
fn activate_all_plays_everything_with_given_weights() {
    let Rig {
        mut mixer,
        controller,
        idle,
        walk,
        run,
    } = rig();

    controller.activate_all(&mut mixer, &[0.0, 1.0, 0.0]);

    for (handle, weight) in [(idle, 0.0), (walk, 1.0), (run, 0.0)] {
        let action = mixer.action(handle).unwrap();
        assert!(action.playing, "all actions play after activate_all");
        assert!(action.enabled);
        assert!(approx(action.weight, weight));
    }
}

#[test]
fn deactivate_all_stops_everything() {
    let Rig {
        mut mixer,
        controller,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[0.0, 1.0, 0.0]);
    mixer.update(0.4);

    controller.deactivate_all(&mut mixer);
    for handle in controller.actions() {
        let action = mixer.action(*handle).unwrap();
        assert!(!action.playing);
        assert!(approx(action.time, 0.0));
    }
}

// ============================================================================
// Pause / single-step state machine
// ============================================================================

#[test]
fn pause_toggle_twice_restores_pause_flags() {
    let Rig {
        mut mixer,
        mut controller,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[0.0, 1.0, 0.0]);

    controller.pause_toggle(&mut mixer);
    for handle in controller.actions() {
        assert!(mixer.action(*handle).unwrap().paused);
    }

    controller.pause_toggle(&mut mixer);
    for handle in controller.actions() {
        assert!(!mixer.action(*handle).unwrap().paused);
    }
}

#[test]
fn single_step_advances_by_step_size_then_freezes() {
    let Rig {
        mut mixer,
        mut controller,
        idle,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[1.0, 0.0, 0.0]);

    controller.enter_single_step(&mut mixer, 0.1);
    controller.per_frame_update(&mut mixer, 0.77).unwrap();
    assert!(
        approx(mixer.action(idle).unwrap().time, 0.1),
        "first stepped frame advances by the step size, got {}",
        mixer.action(idle).unwrap().time
    );

    controller.per_frame_update(&mut mixer, 0.77).unwrap();
    assert!(
        approx(mixer.action(idle).unwrap().time, 0.1),
        "subsequent stepped frames freeze"
    );
}

#[test]
fn pause_toggle_exits_single_step_to_playing() {
    let Rig {
        mut mixer,
        mut controller,
        idle,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[1.0, 0.0, 0.0]);
    controller.enter_single_step(&mut mixer, 0.1);

    controller.pause_toggle(&mut mixer);
    assert!(!controller.single_step());

    controller.per_frame_update(&mut mixer, 0.5).unwrap();
    assert!(
        approx(mixer.action(idle).unwrap().time, 0.5),
        "after exiting single-step the real delta applies"
    );
}

// ============================================================================
// Immediate crossfade out of the base action
// ============================================================================

#[test]
fn crossfade_from_base_executes_immediately() {
    let Rig {
        mut mixer,
        mut controller,
        idle,
        walk,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[0.0, 1.0, 0.0]);
    mixer.update(0.4);

    controller
        .request_cross_fade(&mut mixer, walk, idle, 1.0)
        .unwrap();

    assert!(!controller.has_pending_cross_fade());
    let idle_action = mixer.action(idle).unwrap();
    assert!(approx(idle_action.weight, 1.0), "target starts at full weight");
    assert!(approx(idle_action.time, 0.0), "target restarts from the beginning");
    assert!(mixer.fading(), "a fade is in progress");
}

#[test]
fn crossfade_request_exits_single_step_and_unpauses() {
    let Rig {
        mut mixer,
        mut controller,
        idle,
        walk,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[0.0, 1.0, 0.0]);
    controller.enter_single_step(&mut mixer, 0.1);
    mixer.pause_all();

    controller
        .request_cross_fade(&mut mixer, walk, idle, 1.0)
        .unwrap();

    assert!(!controller.single_step());
    for handle in controller.actions() {
        assert!(!mixer.action(*handle).unwrap().paused);
    }
}

// ============================================================================
// Deferred crossfade out of a non-base action
// ============================================================================

#[test]
fn crossfade_from_non_base_waits_for_loop_boundary() {
    let Rig {
        mut mixer,
        mut controller,
        idle,
        walk,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[1.0, 0.0, 0.0]);

    controller
        .request_cross_fade(&mut mixer, idle, walk, 0.5)
        .unwrap();
    assert!(controller.has_pending_cross_fade());
    assert!(approx(mixer.weight(walk), 0.0), "nothing happens before the loop");

    // idle has 2.0s left; a frame inside the cycle must not fire the fade
    controller.per_frame_update(&mut mixer, 0.3).unwrap();
    assert!(controller.has_pending_cross_fade());
    assert!(approx(mixer.weight(walk), 0.0));

    // this frame wraps idle past its duration
    controller.per_frame_update(&mut mixer, 1.8).unwrap();
    assert!(!controller.has_pending_cross_fade());
    assert!(
        approx(mixer.weight(walk), 1.0),
        "fade executes on the same frame the loop completes"
    );
    assert!(mixer.fading());
}

#[test]
fn newer_deferred_request_replaces_pending_one() {
    let Rig {
        mut mixer,
        mut controller,
        idle,
        walk,
        run,
    } = rig();
    controller.activate_all(&mut mixer, &[1.0, 0.0, 0.0]);

    controller
        .request_cross_fade(&mut mixer, idle, walk, 0.5)
        .unwrap();
    controller
        .request_cross_fade(&mut mixer, idle, run, 0.5)
        .unwrap();

    controller.per_frame_update(&mut mixer, 2.1).unwrap();
    assert!(approx(mixer.weight(run), 1.0), "last request wins");
    assert!(approx(mixer.weight(walk), 0.0), "replaced request never fires");
}

#[test]
fn cancel_pending_crossfade() {
    let Rig {
        mut mixer,
        mut controller,
        idle,
        walk,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[1.0, 0.0, 0.0]);

    controller
        .request_cross_fade(&mut mixer, idle, walk, 0.5)
        .unwrap();
    controller.cancel_pending_cross_fade(idle);
    assert!(!controller.has_pending_cross_fade());

    controller.per_frame_update(&mut mixer, 2.1).unwrap();
    assert!(approx(mixer.weight(walk), 0.0), "cancelled fade never fires");
}

// ============================================================================
// Preconditions and read-back
// ============================================================================

#[test]
fn invalid_requests_are_rejected() {
    let Rig {
        mut mixer,
        mut controller,
        idle,
        walk,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[1.0, 0.0, 0.0]);

    assert!(matches!(
        controller.request_cross_fade(&mut mixer, idle, idle, 1.0),
        Err(WaltzError::DegenerateCrossFade)
    ));
    assert!(matches!(
        controller.request_cross_fade(&mut mixer, idle, walk, -1.0),
        Err(WaltzError::InvalidDuration(_))
    ));

    let mut other = AnimationMixer::new();
    let handles: Vec<_> = (0..5)
        .map(|i| other.add_clip(AnimationClip::new(format!("foreign_{i}"), 1.0)))
        .collect();
    let foreign = *handles.last().unwrap();
    assert!(matches!(
        controller.request_cross_fade(&mut mixer, idle, foreign, 1.0),
        Err(WaltzError::UnknownAction(_))
    ));
}

#[test]
fn per_frame_update_snapshots_weights() {
    let Rig {
        mut mixer,
        mut controller,
        ..
    } = rig();
    controller.activate_all(&mut mixer, &[0.25, 1.0, 0.5]);

    controller.per_frame_update(&mut mixer, 0.016).unwrap();
    let weights = controller.weights();
    assert!(approx(weights[0], 0.25));
    assert!(approx(weights[1], 1.0));
    assert!(approx(weights[2], 0.5));
}
