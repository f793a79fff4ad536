//! Demo wiring: builds the debug panel around a loaded model and drives the
//! blend controller once per frame.
//!
//! The showcase owns everything the panel callbacks touch
//! ([`ShowcaseState`]) separately from the panel itself, so a widget host
//! can hold `&mut` to both at once. Headless hosts and tests drive the same
//! wiring through [`Showcase::advance`] with explicit deltas.

use crate::animation::{ActionHandle, AnimationMixer, BlendController};
use crate::assets::LoadedModel;
use crate::errors::Result;
use crate::panel::{ControlId, Panel, StateStore};
use crate::scene::{NodeHandle, Scene};
use crate::utils::{FpsCounter, Timer};

/// Tunables exposed by the panel, in the shape the original demo persists.
#[derive(Debug, Clone)]
pub struct Settings {
    pub show_model: bool,
    pub show_skeleton: bool,
    pub use_default_duration: bool,
    pub custom_duration: f32,
    pub step_size: f32,
    pub play_music: bool,
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_model: true,
            show_skeleton: false,
            use_default_duration: true,
            custom_duration: 3.5,
            step_size: 0.05,
            play_music: false,
            music_volume: 0.5,
        }
    }
}

impl Settings {
    /// The duration actually used by a crossfade trigger: the trigger's
    /// default unless the custom duration override is active.
    #[must_use]
    pub fn crossfade_duration(&self, default: f32) -> f32 {
        if self.use_default_duration {
            default
        } else {
            self.custom_duration
        }
    }
}

/// Everything the panel callbacks mutate.
pub struct ShowcaseState {
    pub scene: Scene,
    pub mixer: AnimationMixer,
    pub controller: BlendController,
    pub settings: Settings,
    pub model_root: NodeHandle,
    pub skeleton: NodeHandle,
}

/// Panel control ids a rendering host needs to draw and drive the UI.
pub struct ShowcaseControls {
    pub show_model: ControlId,
    pub show_skeleton: ControlId,
    pub activate_all: ControlId,
    pub deactivate_all: ControlId,
    pub pause_continue: ControlId,
    pub single_step: ControlId,
    pub step_size: ControlId,
    pub use_default_duration: ControlId,
    pub custom_duration: ControlId,
    /// One trigger per transition, with its action pair.
    pub crossfades: Vec<(ControlId, ActionHandle, ActionHandle)>,
    pub dances: ControlId,
    pub time_scale: ControlId,
    pub weight_sliders: Vec<ControlId>,
    pub play_music: ControlId,
    pub music_volume: ControlId,
}

pub struct Showcase {
    pub state: ShowcaseState,
    pub panel: Panel<ShowcaseState>,
    pub controls: ShowcaseControls,
    timer: Timer,
    fps: FpsCounter,
}

impl Showcase {
    /// Wires mixer, controller and panel around a loaded model.
    ///
    /// The action set is the model's clips in document order. The base
    /// action follows the demo's three-clip convention: the middle clip is
    /// the steady-state anchor (the first one when only one or two clips
    /// exist). On start the base action plays at full weight, everything
    /// else at zero.
    pub fn new(scene: Scene, model: &LoadedModel) -> Result<Self> {
        let mut scene = scene;
        let mut mixer = AnimationMixer::new();

        let handles: Vec<ActionHandle> = model
            .clips
            .iter()
            .map(|clip| mixer.add_clip(clip.clone()))
            .collect();
        let base = handles.get(1).or_else(|| handles.first()).copied();
        let base = base.ok_or_else(|| {
            crate::errors::WaltzError::AssetNotFound("model has no animation clips".into())
        })?;

        let controller = BlendController::new(&mixer, handles.clone(), base)?;

        let initial_weights: Vec<f32> = handles
            .iter()
            .map(|&h| if h == base { 1.0 } else { 0.0 })
            .collect();
        controller.activate_all(&mut mixer, &initial_weights);

        if let Some(node) = scene.get_node_mut(model.skeleton) {
            node.visible = false;
        }

        let settings = Settings::default();
        let mut state = ShowcaseState {
            scene,
            mixer,
            controller,
            settings,
            model_root: model.root,
            skeleton: model.skeleton,
        };

        let (panel, controls) = build_panel(&mut state, &handles, base);

        Ok(Self {
            state,
            panel,
            controls,
            timer: Timer::new(),
            fps: FpsCounter::new(),
        })
    }

    /// Real-time frame tick: measures the elapsed delta and advances.
    pub fn tick(&mut self) -> Result<()> {
        self.timer.tick();
        let dt = self.timer.dt_seconds();
        self.advance(dt)
    }

    /// Advances one frame by an explicit delta, then reflects the effective
    /// blend weights back into the weight sliders (display only, no
    /// callbacks fire).
    pub fn advance(&mut self, dt: f32) -> Result<()> {
        let state = &mut self.state;
        state.controller.per_frame_update(&mut state.mixer, dt)?;

        for (&slider, &weight) in self
            .controls
            .weight_sliders
            .iter()
            .zip(state.controller.weights())
        {
            self.panel.reflect_number(slider, f64::from(weight));
        }

        if let Some(fps) = self.fps.update() {
            log::debug!("fps: {fps:.1}");
        }
        Ok(())
    }

    // Convenience forwards so hosts do not have to split-borrow the fields.

    pub fn set_bool(&mut self, id: ControlId, value: bool) {
        self.panel.set_bool(&mut self.state, id, value);
    }

    pub fn set_number(&mut self, id: ControlId, value: f64) {
        self.panel.set_number(&mut self.state, id, value);
    }

    pub fn set_option(&mut self, id: ControlId, index: usize) {
        self.panel.set_option(&mut self.state, id, index);
    }

    pub fn trigger(&mut self, id: ControlId) {
        self.panel.trigger(&mut self.state, id);
    }

    /// Reloads persisted panel state, if any.
    pub fn restore_ui(&mut self, store: &mut dyn StateStore) -> bool {
        self.panel.restore(&mut self.state, store)
    }

    /// Persists the current panel state.
    pub fn persist_ui(&self, store: &mut dyn StateStore) -> Result<()> {
        self.panel.persist(store)
    }

    /// Resets the panel to defaults and drops the persisted state.
    pub fn reset_ui(&mut self, store: &mut dyn StateStore) {
        self.panel.reset(&mut self.state, store);
    }
}

fn build_panel(
    state: &mut ShowcaseState,
    handles: &[ActionHandle],
    base: ActionHandle,
) -> (Panel<ShowcaseState>, ShowcaseControls) {
    let mut panel = Panel::<ShowcaseState>::new("Blending Options");
    let settings = state.settings.clone();

    let show_model = panel.add_checkbox(
        "Visibility",
        "show model",
        settings.show_model,
        |state, visible| {
            state.settings.show_model = visible;
            if let Some(node) = state.scene.get_node_mut(state.model_root) {
                node.visible = visible;
            }
        },
    );
    let show_skeleton = panel.add_checkbox(
        "Visibility",
        "show skeleton",
        settings.show_skeleton,
        |state, visible| {
            state.settings.show_skeleton = visible;
            if let Some(node) = state.scene.get_node_mut(state.skeleton) {
                node.visible = visible;
            }
        },
    );

    let deactivate_all = panel.add_button("Activation/Deactivation", "deactivate all", |state| {
        state.controller.deactivate_all(&mut state.mixer);
    });
    let activate_base: Vec<f32> = handles
        .iter()
        .map(|&h| if h == base { 1.0 } else { 0.0 })
        .collect();
    let activate_all = panel.add_button("Activation/Deactivation", "activate all", move |state| {
        state
            .controller
            .activate_all(&mut state.mixer, &activate_base);
    });

    let pause_continue = panel.add_button("Pausing/Stepping", "pause/continue", |state| {
        state.controller.pause_toggle(&mut state.mixer);
    });
    let single_step = panel.add_button("Pausing/Stepping", "make single step", |state| {
        let step = state.settings.step_size;
        state.controller.enter_single_step(&mut state.mixer, step);
    });
    let step_size = panel.add_slider(
        "Pausing/Stepping",
        "modify step size",
        f64::from(settings.step_size),
        0.01,
        0.1,
        |state, value| {
            state.settings.step_size = value as f32;
        },
    );

    let use_default_duration = panel.add_checkbox(
        "Crossfading",
        "use default duration",
        settings.use_default_duration,
        |state, value| {
            state.settings.use_default_duration = value;
        },
    );
    let custom_duration = panel.add_slider(
        "Crossfading",
        "set custom duration",
        f64::from(settings.custom_duration),
        0.0,
        10.0,
        |state, value| {
            state.settings.custom_duration = value as f32;
        },
    );

    // One trigger per transition through the base action, the way the
    // original offers walk<->idle and walk<->run. Leaving the base is quick;
    // returning to it takes longer.
    let mut crossfades = Vec::new();
    for &other in handles.iter().filter(|&&h| h != base) {
        for (from, to, default) in [(base, other, 2.5_f32), (other, base, 1.0_f32)] {
            let label = transition_label(state, from, to);
            let id = panel.add_button("Crossfading", &label, move |state| {
                let duration = state.settings.crossfade_duration(default);
                if let Err(err) =
                    state
                        .controller
                        .request_cross_fade(&mut state.mixer, from, to, duration)
                {
                    log::warn!("crossfade rejected: {err}");
                }
            });
            crossfades.push((id, from, to));
        }
    }

    let dance_names: Vec<String> = handles.iter().map(|&h| action_name(state, h)).collect();
    let dances = panel.add_select("Dances", "dance", dance_names, 0, |_state, name| {
        log::info!("dance selected: {name}");
    });

    let time_scale = panel.add_slider(
        "General Speed",
        "modify time scale",
        1.0,
        0.0,
        1.5,
        |state, value| {
            state.mixer.time_scale = value as f32;
        },
    );

    let mut weight_sliders = Vec::new();
    for &handle in handles {
        let label = format!("modify {} weight", action_name(state, handle));
        let initial = if handle == base { 1.0 } else { 0.0 };
        let id = panel.add_slider("Blend Weights", &label, initial, 0.0, 1.0, move |state, value| {
            state
                .controller
                .set_weight(&mut state.mixer, handle, value as f32);
        });
        weight_sliders.push(id);
    }

    let play_music = panel.add_checkbox("Music", "play music", settings.play_music, |state, play| {
        state.settings.play_music = play;
        // Audio output is owned by the host; we only keep the flag.
        log::info!("music {}", if play { "on" } else { "off" });
    });
    let music_volume = panel.add_slider(
        "Music",
        "modify music volume",
        f64::from(settings.music_volume),
        0.0,
        1.0,
        |state, value| {
            state.settings.music_volume = value as f32;
        },
    );

    let controls = ShowcaseControls {
        show_model,
        show_skeleton,
        activate_all,
        deactivate_all,
        pause_continue,
        single_step,
        step_size,
        use_default_duration,
        custom_duration,
        crossfades,
        dances,
        time_scale,
        weight_sliders,
        play_music,
        music_volume,
    };
    (panel, controls)
}

fn action_name(state: &ShowcaseState, handle: ActionHandle) -> String {
    state
        .mixer
        .action(handle)
        .map_or_else(|| "unknown".to_string(), |a| a.clip().name.clone())
}

fn transition_label(state: &ShowcaseState, from: ActionHandle, to: ActionHandle) -> String {
    format!(
        "from {} to {}",
        action_name(state, from),
        action_name(state, to)
    )
}
