//! Headless showcase runner.
//!
//! Loads a glTF model when a path is given (`waltz-showcase model.glb`),
//! otherwise falls back to a synthetic idle/walk/run clip set, then drives
//! the blend controller at ~60 fps for a few seconds, triggering the first
//! two crossfade transitions along the way and logging the blend weights.

use std::time::Duration;

use waltz::assets::LoadedModel;
use waltz::panel::JsonFileStore;
use waltz::{AnimationClip, Scene, Showcase};

const UI_STATE_PATH: &str = "waltz-ui.json";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut scene = Scene::new();
    let model = match std::env::args().nth(1) {
        #[cfg(feature = "gltf")]
        Some(path) => match waltz::assets::load_gltf(&mut scene, &path) {
            Ok(model) => model,
            Err(err) => {
                // Load failures are logged, not recovered.
                log::error!("error while loading model '{path}': {err}");
                return Err(err.into());
            }
        },
        #[cfg(not(feature = "gltf"))]
        Some(path) => {
            log::error!("built without the 'gltf' feature, cannot load '{path}'");
            anyhow::bail!("gltf support disabled");
        }
        None => {
            log::info!("no model given, using synthetic clips");
            LoadedModel::from_clips(
                &mut scene,
                "synthetic",
                vec![
                    AnimationClip::new("idle", 2.4),
                    AnimationClip::new("walk", 0.9),
                    AnimationClip::new("run", 0.6),
                ],
            )
        }
    };

    let mut showcase = Showcase::new(scene, &model)?;

    let mut store = JsonFileStore::open(UI_STATE_PATH);
    if showcase.restore_ui(&mut store) {
        log::info!("restored panel state from {UI_STATE_PATH}");
    }

    let transitions: Vec<_> = showcase
        .controls
        .crossfades
        .iter()
        .map(|&(id, _, _)| id)
        .collect();

    for frame in 0..900_u32 {
        // Exercise the first two transitions a couple of seconds apart.
        if frame == 120
            && let Some(&id) = transitions.first()
        {
            showcase.trigger(id);
        }
        if frame == 480
            && let Some(&id) = transitions.get(1)
        {
            showcase.trigger(id);
        }

        showcase.tick()?;

        if frame % 60 == 0 {
            let weights: Vec<String> = showcase
                .state
                .controller
                .weights()
                .iter()
                .map(|w| format!("{w:.2}"))
                .collect();
            log::info!("t={:>3}s weights=[{}]", frame / 60, weights.join(", "));
        }

        std::thread::sleep(Duration::from_millis(16));
    }

    showcase.persist_ui(&mut store)?;
    Ok(())
}
