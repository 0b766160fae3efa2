use sevenfold_core::TrackSet;

const WINDOW: usize = 60;

fn format_set(set: TrackSet) -> String {
    if set.is_empty() {
        return "-".to_string();
    }
    set.iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Debug panel (F3): adapter info, frame timing, camera, and scene state.
pub struct DebugPanel {
    adapter_name: String,
    backend: String,
    frame_times: [f64; WINDOW],
    frame_index: usize,
    avg_frame_time_ms: f64,
    camera_pos: [f32; 3],
    camera_target: [f32; 3],
    focused: Option<usize>,
    armed: TrackSet,
    sounding: TrackSet,
    tracks_settled: usize,
    triangles: u32,
    particles: u32,
}

impl DebugPanel {
    pub fn new(adapter: &wgpu::AdapterInfo) -> Self {
        Self {
            adapter_name: adapter.name.clone(),
            backend: format!("{:?}", adapter.backend),
            frame_times: [0.0; WINDOW],
            frame_index: 0,
            avg_frame_time_ms: 0.0,
            camera_pos: [0.0; 3],
            camera_target: [0.0; 3],
            focused: None,
            armed: TrackSet::EMPTY,
            sounding: TrackSet::EMPTY,
            tracks_settled: 0,
            triangles: 0,
            particles: 0,
        }
    }

    /// Record a frame's delta time and update rolling average.
    pub fn update(&mut self, delta_ms: f64) {
        self.frame_times[self.frame_index] = delta_ms;
        self.frame_index = (self.frame_index + 1) % WINDOW;
        let sum: f64 = self.frame_times.iter().sum();
        self.avg_frame_time_ms = sum / WINDOW as f64;
    }

    pub fn avg_frame_time_ms(&self) -> f64 {
        self.avg_frame_time_ms
    }

    pub fn set_camera_info(&mut self, pos: [f32; 3], target: [f32; 3]) {
        self.camera_pos = pos;
        self.camera_target = target;
    }

    pub fn set_scene_info(&mut self, focused: Option<usize>, armed: TrackSet) {
        self.focused = focused;
        self.armed = armed;
    }

    pub fn set_audio_info(&mut self, sounding: TrackSet, settled: usize) {
        self.sounding = sounding;
        self.tracks_settled = settled;
    }

    pub fn set_render_info(&mut self, triangles: u32, particles: u32) {
        self.triangles = triangles;
        self.particles = particles;
    }

    pub fn show(&self, ctx: &egui::Context) {
        egui::Window::new("Debug")
            .default_open(true)
            .resizable(false)
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
            .show(ctx, |ui| {
                ui.label(&self.adapter_name);
                ui.label(&self.backend);
                ui.separator();
                let fps = if self.avg_frame_time_ms > 0.0 {
                    1000.0 / self.avg_frame_time_ms
                } else {
                    0.0
                };
                ui.label(format!("{:.2} ms", self.avg_frame_time_ms));
                ui.label(format!("{:.0} FPS", fps));
                ui.label(format!("{} tris | {} particles", self.triangles, self.particles));
                ui.separator();
                ui.label(format!(
                    "Cam: ({:.1}, {:.1}, {:.1})",
                    self.camera_pos[0], self.camera_pos[1], self.camera_pos[2]
                ));
                ui.label(format!(
                    "Target: ({:.1}, {:.1}, {:.1})",
                    self.camera_target[0], self.camera_target[1], self.camera_target[2]
                ));
                ui.separator();
                let focused = self
                    .focused
                    .map_or_else(|| "-".to_string(), |i| i.to_string());
                ui.label(format!("Focused: {focused}"));
                ui.label(format!("Armed: {}", format_set(self.armed)));
                ui.label(format!(
                    "Sounding: {} ({}/7 loaded)",
                    format_set(self.sounding),
                    self.tracks_settled
                ));
            });
    }
}
