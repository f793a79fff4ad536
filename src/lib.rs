#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod panel;
pub mod scene;
pub mod showcase;
pub mod utils;

pub use animation::{
    ActionHandle, AnimationAction, AnimationClip, AnimationMixer, BlendController, LoopMode,
};
pub use errors::WaltzError;
pub use panel::{ControlValue, Panel, StateStore};
pub use scene::{Node, NodeHandle, Scene};
pub use showcase::{Settings, Showcase};
pub use utils::time::Timer;
