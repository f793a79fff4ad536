use std::sync::Arc;

/// One named animation, identified by its length in seconds.
///
/// Keyframe data itself stays with the sampling backend; the mixer and the
/// blend controller only need the cycle length to wrap playback time and to
/// warp time scales during crossfades.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            duration,
        })
    }
}
