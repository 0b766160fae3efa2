use sevenfold_core::constants::{CENTER_DIAMOND, DIAMOND_COUNT};
use sevenfold_core::{DiamondIndex, TrackSet};

/// Spin rate of an armed diamond, radians per second (clockwise from above).
const SPIN_RATE: f32 = -2.0;
/// Point light intensity while a diamond spins.
const SPIN_LIGHT_INTENSITY: f32 = 0.5;

/// Visual state of one diamond for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiamondVisual {
    /// Rotation about the vertical axis, radians.
    pub rotation_y: f32,
    /// Brightness multiplier for the white ring pattern.
    pub glow: f32,
    pub aura_visible: bool,
    pub aura_opacity: f32,
    /// Aura particle cloud rotation (x, y), radians.
    pub aura_rotation: [f32; 2],
    pub light_intensity: f32,
    pub light_range: f32,
}

impl DiamondVisual {
    fn idle(index: usize) -> Self {
        Self {
            rotation_y: 0.0,
            glow: 1.0,
            aura_visible: false,
            aura_opacity: 0.0,
            aura_rotation: [0.0; 2],
            light_intensity: 0.0,
            light_range: light_range(index),
        }
    }
}

/// Reach of a diamond's glow light; the centre diamond lights further.
pub fn light_range(index: usize) -> f32 {
    if index == CENTER_DIAMOND as usize {
        50.0
    } else {
        40.0
    }
}

/// Per-diamond spin, glow, aura, and light state.
/// A diamond that stops spinning keeps the rotation it had.
pub struct DiamondAnimator {
    visuals: [DiamondVisual; DIAMOND_COUNT],
}

impl Default for DiamondAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl DiamondAnimator {
    pub fn new() -> Self {
        Self {
            visuals: std::array::from_fn(DiamondVisual::idle),
        }
    }

    /// Recompute every diamond for scene time `t` (seconds).
    pub fn update(&mut self, t: f32, spinning: TrackSet) {
        let pulse = (t * 2.0).sin();
        for index in DiamondIndex::all() {
            let v = &mut self.visuals[index.get()];
            if spinning.contains(index) {
                v.rotation_y = SPIN_RATE * t;
                v.glow = 1.4 + pulse * 0.4;
                v.aura_visible = true;
                v.aura_opacity = 0.6 + pulse * 0.2;
                v.aura_rotation = [t * 0.3, t * 0.5];
                v.light_intensity = SPIN_LIGHT_INTENSITY;
            } else {
                v.glow = 1.0;
                v.aura_visible = false;
                v.aura_opacity = 0.0;
                v.light_intensity = 0.0;
            }
        }
    }

    pub fn visual(&self, index: DiamondIndex) -> &DiamondVisual {
        &self.visuals[index.get()]
    }

    pub fn visuals(&self) -> &[DiamondVisual; DIAMOND_COUNT] {
        &self.visuals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: usize) -> DiamondIndex {
        DiamondIndex::new(i).expect("valid index")
    }

    #[test]
    fn test_spinning_diamond() {
        let mut anim = DiamondAnimator::new();
        let spinning: TrackSet = [idx(1)].into_iter().collect();
        let t = std::f32::consts::FRAC_PI_4; // sin(2t) = 1
        anim.update(t, spinning);

        let v = anim.visual(idx(1));
        assert!((v.rotation_y + 2.0 * t).abs() < 1e-6);
        assert!((v.glow - 1.8).abs() < 1e-6);
        assert!(v.aura_visible);
        assert!((v.aura_opacity - 0.8).abs() < 1e-6);
        assert_eq!(v.light_intensity, 0.5);

        let idle = anim.visual(idx(0));
        assert_eq!(idle.glow, 1.0);
        assert!(!idle.aura_visible);
        assert_eq!(idle.light_intensity, 0.0);
    }

    #[test]
    fn test_stop_keeps_rotation() {
        let mut anim = DiamondAnimator::new();
        let spinning: TrackSet = [idx(4)].into_iter().collect();
        anim.update(3.0, spinning);
        let held = anim.visual(idx(4)).rotation_y;

        anim.update(5.0, TrackSet::EMPTY);
        let v = anim.visual(idx(4));
        assert_eq!(v.rotation_y, held);
        assert_eq!(v.glow, 1.0);
        assert!(!v.aura_visible);
    }

    #[test]
    fn test_light_ranges() {
        let anim = DiamondAnimator::new();
        assert_eq!(anim.visual(idx(3)).light_range, 50.0);
        for i in [0, 1, 2, 4, 5, 6] {
            assert_eq!(anim.visual(idx(i)).light_range, 40.0);
        }
    }
}
