pub mod animation;
pub mod camera;
pub mod input;
pub mod picking;
pub mod store;

use animation::DiamondAnimator;
use camera::{CameraRig, FocusController};
use glam::Vec2;
use input::{Command, OverlayFlags};
use picking::Ray;
use sevenfold_core::{DiamondIndex, DiamondTable};
use store::{SceneEvent, SceneStore};

/// Primary public struct for the sevenfold-scene crate.
/// Owns scene state, the camera, and diamond animation; the web layer feeds
/// it commands and clicks and reads it back for rendering and audio.
pub struct Scene {
    table: DiamondTable,
    store: SceneStore,
    rig: CameraRig,
    focus: FocusController,
    animator: DiamondAnimator,
    overlay: OverlayFlags,
    start_ms: f64,
}

impl Scene {
    pub fn new(table: DiamondTable, is_mobile: bool, now_ms: f64) -> Self {
        Self {
            table,
            store: SceneStore::new(is_mobile),
            rig: CameraRig::new(),
            focus: FocusController::new(now_ms),
            animator: DiamondAnimator::new(),
            overlay: OverlayFlags::default(),
            start_ms: now_ms,
        }
    }

    pub fn command(&mut self, command: Command) {
        input::apply_command(command, &mut self.store, &mut self.rig, &mut self.overlay);
    }

    /// Handle a click on the canvas. Returns the diamond under the cursor.
    pub fn click(&mut self, cursor: Vec2, screen: Vec2) -> Option<DiamondIndex> {
        let view_proj = self.rig.view_proj(screen.x, screen.y);
        let ray = Ray::from_screen(cursor, screen, view_proj)?;
        let hit = picking::pick_diamond(&ray, &self.table)?;
        log::info!("clicked diamond {} ({})", hit, self.table.get(hit).name);
        self.store.toggle_focus(hit);
        Some(hit)
    }

    /// Advance one frame. Returns the state changes recorded since the last
    /// frame, after the camera has reacted to them.
    pub fn update(&mut self, now_ms: f64) -> Vec<SceneEvent> {
        let events = self.store.drain_events();
        for event in &events {
            if let SceneEvent::FocusChanged(focus) = event {
                let target = focus.map(|i| (i, self.table.get(i)));
                self.focus.on_focus_changed(&mut self.rig, target, now_ms);
            }
        }
        self.focus.update(&mut self.rig, now_ms);

        let t = ((now_ms - self.start_ms) / 1000.0) as f32;
        self.animator.update(t, self.store.spinning());
        events
    }

    pub fn table(&self) -> &DiamondTable {
        &self.table
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SceneStore {
        &mut self.store
    }

    pub fn camera(&self) -> &CameraRig {
        &self.rig
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    pub fn animator(&self) -> &DiamondAnimator {
        &self.animator
    }

    pub fn overlay(&self) -> &OverlayFlags {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayFlags {
        &mut self.overlay
    }
}
