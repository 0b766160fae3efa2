pub mod debug;
pub mod help;
pub mod loading;
pub mod player;

use egui_wgpu::ScreenDescriptor;

/// Dark overlay look: translucent black panels with thin light strokes so
/// the scene stays visible behind them.
fn overlay_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = egui::Color32::from_black_alpha(200);
    visuals.panel_fill = egui::Color32::from_black_alpha(200);
    visuals.window_stroke = egui::Stroke::new(1.0, egui::Color32::from_gray(60));
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;
    visuals
}

/// egui context plus its wgpu renderer.
pub struct UiState {
    pub ctx: egui::Context,
    pub renderer: egui_wgpu::Renderer,
}

impl UiState {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, dpi_scale: f32) -> Self {
        let ctx = egui::Context::default();
        ctx.set_pixels_per_point(dpi_scale);
        ctx.set_visuals(overlay_visuals());

        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self { ctx, renderer }
    }

    pub fn screen_descriptor(&self, width: u32, height: u32) -> ScreenDescriptor {
        ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: self.ctx.pixels_per_point(),
        }
    }

    /// Frame input for egui: the screen in points, the clock, and the
    /// pointer events collected since the last frame.
    pub fn raw_input(
        &self,
        screen: &ScreenDescriptor,
        now_ms: f64,
        events: Vec<egui::Event>,
    ) -> egui::RawInput {
        let size = egui::vec2(
            screen.size_in_pixels[0] as f32,
            screen.size_in_pixels[1] as f32,
        ) / screen.pixels_per_point;
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, size)),
            time: Some(now_ms / 1000.0),
            events,
            ..Default::default()
        }
    }
}
