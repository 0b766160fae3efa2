use glam::{Mat4, Vec2, Vec3};
use sevenfold_core::constants::{
    CAMERA_ANIMATION_MS, CAMERA_DAMPING, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_MAX_DISTANCE,
    CAMERA_MIN_DISTANCE, CAMERA_NEAR, CAMERA_START_POSITION, CAMERA_START_TARGET, CAMERA_STEP,
    FOCUS_HEIGHT, FOCUS_OFFSET, INTRO_DELAY_MS, OVERVIEW_POSITION, OVERVIEW_TARGET,
};
use sevenfold_core::math::{ease_out_cubic, offset_to_spherical, progress, spherical_to_offset};
use sevenfold_core::{CameraPose, DiamondDef, DiamondIndex};

/// Radians of orbit per pixel of mouse movement.
const ORBIT_SPEED: f32 = 0.005;
/// Keeps the polar angle off the poles so `look_at` stays well defined.
const POLAR_EPSILON: f32 = 0.01;
/// Below this the residual orbit velocity is dropped.
const VELOCITY_EPSILON: f32 = 1e-5;

/// The pose the camera returns to when nothing is focused.
pub fn overview_pose() -> CameraPose {
    CameraPose::new(
        Vec3::from_array(OVERVIEW_POSITION),
        Vec3::from_array(OVERVIEW_TARGET),
    )
}

/// Close-up pose for a diamond. Each index approaches from its own angle
/// (index · 60°) so neighbouring diamonds are framed differently.
pub fn focus_pose(index: DiamondIndex, diamond: &DiamondDef) -> CameraPose {
    let target = diamond.position();
    let angle = index.get() as f32 * std::f32::consts::FRAC_PI_3;
    let position = Vec3::new(
        target.x + angle.cos() * FOCUS_OFFSET,
        target.y + FOCUS_HEIGHT,
        target.z + angle.sin() * FOCUS_OFFSET,
    );
    CameraPose::new(position, target)
}

/// A single pose-to-pose tween with cubic ease-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAnimation {
    pub start: CameraPose,
    pub end: CameraPose,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl CameraAnimation {
    /// Interpolated pose at `now_ms`, plus whether the tween has finished.
    pub fn sample(&self, now_ms: f64) -> (CameraPose, bool) {
        let p = progress(now_ms, self.start_ms, self.duration_ms);
        let eased = ease_out_cubic(p);
        let pose = CameraPose::new(
            self.start.position.lerp(self.end.position, eased),
            self.start.target.lerp(self.end.target, eased),
        );
        (pose, p >= 1.0)
    }
}

/// One-unit keyboard camera moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Orbit camera around a target point with damped user rotation and
/// scripted pose animations. A new animation replaces the in-flight one;
/// any user input cancels it.
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f32,
    /// Pending (azimuth, polar) rotation, bled off by the damping factor.
    orbit_velocity: Vec2,
    animation: Option<CameraAnimation>,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            position: Vec3::from_array(CAMERA_START_POSITION),
            target: Vec3::from_array(CAMERA_START_TARGET),
            fov_y_rad: CAMERA_FOV_DEG.to_radians(),
            orbit_velocity: Vec2::ZERO,
            animation: None,
        }
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.target)
    }

    pub fn animation(&self) -> Option<&CameraAnimation> {
        self.animation.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Start tweening from the current pose to `end`.
    pub fn animate_to(&mut self, end: CameraPose, now_ms: f64, duration_ms: f64) {
        self.orbit_velocity = Vec2::ZERO;
        self.animation = Some(CameraAnimation {
            start: self.pose(),
            end,
            start_ms: now_ms,
            duration_ms,
        });
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Unit vector to the camera's right, parallel to the ground.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    /// Queue a rotation from a mouse drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.animation = None;
        self.orbit_velocity += Vec2::new(-dx, -dy) * ORBIT_SPEED;
    }

    /// Translate camera and target in the view plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.animation = None;
        let right = self.right();
        let up = right.cross(self.forward()).normalize_or_zero();
        let speed = self.distance() * 0.002;
        let shift = right * (-dx * speed) + up * (dy * speed);
        self.position += shift;
        self.target += shift;
    }

    /// Dolly towards (positive) or away from (negative) the target.
    pub fn zoom(&mut self, delta: f32) {
        self.animation = None;
        let offset = self.position - self.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        let new_distance = (distance - delta * distance * 0.1)
            .clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
        self.position = self.target + offset / distance * new_distance;
    }

    pub fn step(&mut self, direction: StepDirection) {
        self.animation = None;
        let shift = match direction {
            StepDirection::Forward => self.forward(),
            StepDirection::Backward => -self.forward(),
            StepDirection::Left => -self.right(),
            StepDirection::Right => self.right(),
            StepDirection::Up => Vec3::Y,
            StepDirection::Down => Vec3::NEG_Y,
        } * CAMERA_STEP;
        self.position += shift;
        self.target += shift;
    }

    /// Advance the active animation, or apply damped orbit rotation.
    pub fn update(&mut self, now_ms: f64) {
        if let Some(animation) = self.animation {
            let (pose, done) = animation.sample(now_ms);
            self.position = pose.position;
            self.target = pose.target;
            if done {
                self.animation = None;
            }
            return;
        }

        if self.orbit_velocity.length_squared() < VELOCITY_EPSILON * VELOCITY_EPSILON {
            self.orbit_velocity = Vec2::ZERO;
            return;
        }

        let (radius, polar, azimuth) = offset_to_spherical(self.position - self.target);
        let azimuth = azimuth + self.orbit_velocity.x * CAMERA_DAMPING;
        let polar = (polar + self.orbit_velocity.y * CAMERA_DAMPING)
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
        let radius = radius.clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
        self.position = self.target + spherical_to_offset(radius, polar, azimuth);
        self.orbit_velocity *= 1.0 - CAMERA_DAMPING;
    }

    pub fn view_proj(&self, width: f32, height: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let aspect = if height > 0.0 { width / height } else { 1.0 };
        let proj = Mat4::perspective_rh(self.fov_y_rad, aspect, CAMERA_NEAR, CAMERA_FAR);
        proj * view
    }
}

/// Drives the rig from focus changes: focused diamond → focus pose,
/// no focus → overview. Also owns the one-shot intro move to the overview.
pub struct FocusController {
    intro_at_ms: Option<f64>,
}

impl FocusController {
    /// Schedule the intro animation relative to `now_ms`.
    pub fn new(now_ms: f64) -> Self {
        Self {
            intro_at_ms: Some(now_ms + INTRO_DELAY_MS),
        }
    }

    pub fn on_focus_changed(
        &mut self,
        rig: &mut CameraRig,
        focus: Option<(DiamondIndex, &DiamondDef)>,
        now_ms: f64,
    ) {
        self.intro_at_ms = None;
        let pose = match focus {
            Some((index, diamond)) => focus_pose(index, diamond),
            None => overview_pose(),
        };
        rig.animate_to(pose, now_ms, CAMERA_ANIMATION_MS);
    }

    pub fn update(&mut self, rig: &mut CameraRig, now_ms: f64) {
        if let Some(at) = self.intro_at_ms {
            if now_ms >= at {
                self.intro_at_ms = None;
                rig.animate_to(overview_pose(), now_ms, CAMERA_ANIMATION_MS);
            }
        }
        rig.update(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevenfold_core::DiamondTable;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_focus_pose_formula() {
        let table = DiamondTable::builtin();
        let i = DiamondIndex::new(0).expect("valid");
        let pose = focus_pose(i, table.get(i));
        // angle 0: offset straight along +X
        assert!(close(pose.position, Vec3::new(-75.0, 153.0, -30.0)));
        assert!(close(pose.target, Vec3::new(-90.0, 145.0, -30.0)));

        let i = DiamondIndex::new(3).expect("valid");
        let pose = focus_pose(i, table.get(i));
        // angle π: offset along -X
        assert!(close(pose.position, Vec3::new(-15.0, 158.0, 0.0)), "{pose:?}");
    }

    #[test]
    fn test_animation_reaches_end_and_clears() {
        let mut rig = CameraRig::new();
        let end = overview_pose();
        rig.animate_to(end, 1000.0, 2000.0);

        rig.update(1000.0);
        assert!(close(rig.position, Vec3::from_array(CAMERA_START_POSITION)));
        assert!(rig.is_animating());

        rig.update(2000.0);
        let mid = rig.position;
        let start = Vec3::from_array(CAMERA_START_POSITION);
        // eased 0.875 of the way at half time
        let expected = start.lerp(end.position, 0.875);
        assert!(close(mid, expected), "mid {mid:?} expected {expected:?}");

        rig.update(3000.0);
        assert!(close(rig.position, end.position));
        assert!(close(rig.target, end.target));
        assert!(!rig.is_animating());
    }

    #[test]
    fn test_new_animation_starts_from_current_pose() {
        let mut rig = CameraRig::new();
        rig.animate_to(overview_pose(), 0.0, 2000.0);
        rig.update(1000.0);
        let halfway = rig.pose();

        let table = DiamondTable::builtin();
        let i = DiamondIndex::new(5).expect("valid");
        let focus = focus_pose(i, table.get(i));
        rig.animate_to(focus, 1000.0, 2000.0);

        let anim = rig.animation().expect("animating");
        assert_eq!(anim.start, halfway);
        assert_eq!(anim.end, focus);

        rig.update(3000.0);
        assert!(close(rig.position, focus.position));
    }

    #[test]
    fn test_user_input_cancels_animation() {
        let mut rig = CameraRig::new();
        rig.animate_to(overview_pose(), 0.0, 2000.0);
        rig.orbit(10.0, 0.0);
        assert!(!rig.is_animating());
    }

    #[test]
    fn test_orbit_keeps_distance_and_target() {
        let mut rig = CameraRig::new();
        let distance = rig.distance();
        let target = rig.target;
        rig.orbit(120.0, -40.0);
        for i in 0..400 {
            rig.update(i as f64 * 16.0);
        }
        assert!((rig.distance() - distance).abs() < 1e-2);
        assert_eq!(rig.target, target);
        assert!(!close(rig.position, Vec3::from_array(CAMERA_START_POSITION)));
    }

    #[test]
    fn test_damped_orbit_sums_to_input() {
        let mut rig = CameraRig::new();
        let (_, _, az0) = offset_to_spherical(rig.position - rig.target);
        rig.orbit(-100.0, 0.0);
        for i in 0..2000 {
            rig.update(i as f64);
        }
        let (_, _, az1) = offset_to_spherical(rig.position - rig.target);
        assert!(((az1 - az0) - 100.0 * ORBIT_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut rig = CameraRig::new();
        for _ in 0..200 {
            rig.zoom(5.0);
        }
        assert!((rig.distance() - CAMERA_MIN_DISTANCE).abs() < 1e-3);
        for _ in 0..500 {
            rig.zoom(-5.0);
        }
        assert!((rig.distance() - CAMERA_MAX_DISTANCE).abs() < 1e-1);
    }

    #[test]
    fn test_step_moves_position_and_target() {
        let mut rig = CameraRig::new();
        let before = rig.pose();
        rig.step(StepDirection::Up);
        assert!(close(rig.position, before.position + Vec3::Y));
        assert!(close(rig.target, before.target + Vec3::Y));

        let forward = rig.forward();
        rig.step(StepDirection::Forward);
        assert!(close(rig.position, before.position + Vec3::Y + forward));

        let right = rig.right();
        rig.step(StepDirection::Left);
        assert!(close(
            rig.position,
            before.position + Vec3::Y + forward - right
        ));
    }

    #[test]
    fn test_intro_then_focus() {
        let table = DiamondTable::builtin();
        let mut rig = CameraRig::new();
        let mut ctl = FocusController::new(0.0);

        ctl.update(&mut rig, 50.0);
        assert!(!rig.is_animating(), "intro not yet due");

        ctl.update(&mut rig, 100.0);
        assert_eq!(rig.animation().expect("intro").end, overview_pose());

        let i = DiamondIndex::new(1).expect("valid");
        ctl.on_focus_changed(&mut rig, Some((i, table.get(i))), 500.0);
        assert_eq!(rig.animation().expect("focus").end, focus_pose(i, table.get(i)));

        ctl.update(&mut rig, 2500.0);
        assert!(close(rig.target, table.get(i).position()));

        ctl.on_focus_changed(&mut rig, None, 2600.0);
        ctl.update(&mut rig, 4600.0);
        assert!(close(rig.position, overview_pose().position));
    }

    #[test]
    fn test_early_focus_cancels_intro() {
        let table = DiamondTable::builtin();
        let mut rig = CameraRig::new();
        let mut ctl = FocusController::new(0.0);
        let i = DiamondIndex::new(4).expect("valid");
        ctl.on_focus_changed(&mut rig, Some((i, table.get(i))), 10.0);
        ctl.update(&mut rig, 150.0);
        assert_eq!(rig.animation().expect("focus").end, focus_pose(i, table.get(i)));
    }
}
