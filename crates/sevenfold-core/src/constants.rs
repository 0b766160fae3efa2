//! Single source of truth for shared tuning constants.
//! Values consumed by WGSL are injected into the shader preamble by the
//! renderer, so they must not be duplicated in shader source.

/// Number of diamond landmarks (and audio tracks) in the scene.
pub const DIAMOND_COUNT: usize = 7;

/// Index of the central, larger diamond.
pub const CENTER_DIAMOND: u8 = 3;

// -- Camera --

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEG: f32 = 60.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 2000.0;

/// Orbit distance limits (world units from the target).
pub const CAMERA_MIN_DISTANCE: f32 = 2.0;
pub const CAMERA_MAX_DISTANCE: f32 = 1200.0;

/// Fraction of orbit velocity applied (and removed) per frame.
pub const CAMERA_DAMPING: f32 = 0.05;

/// Pose the camera holds before the intro animation.
pub const CAMERA_START_POSITION: [f32; 3] = [20.0, 20.0, 20.0];
pub const CAMERA_START_TARGET: [f32; 3] = [0.0, 10.0, 0.0];

/// Overview pose the camera returns to when nothing is focused.
pub const OVERVIEW_POSITION: [f32; 3] = [-138.64, 161.27, 41.32];
pub const OVERVIEW_TARGET: [f32; 3] = [45.28, 96.57, -25.90];

/// Horizontal distance of the focus pose from its diamond.
pub const FOCUS_OFFSET: f32 = 15.0;
/// Height of the focus pose above its diamond.
pub const FOCUS_HEIGHT: f32 = 8.0;

/// Duration of every pose-to-pose camera animation.
pub const CAMERA_ANIMATION_MS: f64 = 2000.0;

/// Delay before the intro animation to the overview pose starts.
pub const INTRO_DELAY_MS: f64 = 100.0;

/// Distance moved by one keyboard camera step.
pub const CAMERA_STEP: f32 = 1.0;

// -- Lighting --

/// Directional light used by the binary toon shader (not normalized).
pub const LIGHT_DIRECTION: [f32; 3] = [5.0, 10.0, 5.0];

/// N·L threshold separating the lit and unlit bands.
pub const TOON_THRESHOLD: f32 = 0.5;

/// Radius of the ground disc.
pub const GROUND_RADIUS: f32 = 800.0;

// -- Audio --

/// Reference distance of the exponential distance model.
pub const AUDIO_REF_DISTANCE: f32 = 10.0;
pub const AUDIO_ROLLOFF: f32 = 0.5;
pub const AUDIO_MAX_DISTANCE: f32 = 10_000.0;

/// Base gain of desktop (spatialized) tracks.
pub const DESKTOP_TRACK_GAIN: f32 = 1.25;

// -- Overlay timing --

/// Delay between the scene becoming ready and the overlay reveal starting.
pub const CANVAS_FADE_DELAY_MS: f64 = 500.0;
/// Loading screen fade-out duration.
pub const LOADING_FADE_MS: f64 = 1500.0;
/// Delay before the music player fades in.
pub const MENU_FADE_DELAY_MS: f64 = 2000.0;
/// Fade-in duration of the canvas and the music player.
pub const REVEAL_FADE_MS: f64 = 1000.0;

/// Frames arriving after a longer gap are treated as a resumed tab.
pub const MAX_FRAME_GAP_MS: f64 = 100.0;
