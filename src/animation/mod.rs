pub mod action;
pub mod blend;
pub mod clip;
pub mod mixer;

pub use action::{AnimationAction, LoopMode};
pub use blend::BlendController;
pub use clip::AnimationClip;
pub use mixer::{ActionHandle, AnimationMixer};
