use glam::Vec3;
use sevenfold_core::constants::{
    AUDIO_MAX_DISTANCE, AUDIO_REF_DISTANCE, AUDIO_ROLLOFF, CENTER_DIAMOND, DESKTOP_TRACK_GAIN,
};
use sevenfold_core::{DiamondIndex, Platform};

/// The track mixed one notch quieter than the rest.
const QUIET_TRACK: usize = 4;

/// Where the listener is and which way is "right" for stereo panning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listener {
    pub position: Vec3,
    /// Unit vector pointing to the listener's right.
    pub right: Vec3,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            right: Vec3::X,
        }
    }
}

/// Per-track mix level before any distance attenuation.
pub fn track_gain(index: DiamondIndex, platform: Platform) -> f32 {
    let i = index.get();
    match platform {
        Platform::Desktop => {
            if i == CENTER_DIAMOND as usize {
                DESKTOP_TRACK_GAIN * 1.75
            } else if i == QUIET_TRACK {
                0.75 * DESKTOP_TRACK_GAIN
            } else {
                DESKTOP_TRACK_GAIN
            }
        }
        Platform::Mobile => {
            if i == QUIET_TRACK {
                0.9375
            } else {
                1.0
            }
        }
    }
}

/// Exponential distance model: (d / ref)^-rolloff with d clamped to [ref, max].
pub fn distance_gain(distance: f32) -> f32 {
    let d = distance.clamp(AUDIO_REF_DISTANCE, AUDIO_MAX_DISTANCE);
    (d / AUDIO_REF_DISTANCE).powf(-AUDIO_ROLLOFF)
}

/// Stereo position of a source in [-1, 1]; 0 when the source sits on the listener.
pub fn stereo_pan(listener: &Listener, source: Vec3) -> f32 {
    let dir = (source - listener.position).normalize_or_zero();
    dir.dot(listener.right).clamp(-1.0, 1.0)
}

/// Final (gain, pan) for a track heard from `listener`.
pub fn spatialize(
    index: DiamondIndex,
    platform: Platform,
    listener: &Listener,
    source: Vec3,
) -> (f32, f32) {
    let base = track_gain(index, platform);
    match platform {
        Platform::Mobile => (base, 0.0),
        Platform::Desktop => {
            let distance = (source - listener.position).length();
            (base * distance_gain(distance), stereo_pan(listener, source))
        }
    }
}
