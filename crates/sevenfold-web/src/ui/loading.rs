use sevenfold_core::constants::{
    CANVAS_FADE_DELAY_MS, LOADING_FADE_MS, MENU_FADE_DELAY_MS, REVEAL_FADE_MS,
};

/// Start-up reveal: once the scene is ready the loading screen fades out,
/// the scene fades in, and the music player follows after a delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct RevealTimeline {
    ready_at_ms: Option<f64>,
}

fn ramp(now_ms: f64, start_ms: f64, duration_ms: f64) -> f32 {
    if now_ms <= start_ms {
        0.0
    } else if duration_ms <= 0.0 {
        1.0
    } else {
        ((now_ms - start_ms) / duration_ms).min(1.0) as f32
    }
}

impl RevealTimeline {
    /// Record the moment the scene became ready. Later calls are ignored.
    pub fn mark_ready(&mut self, now_ms: f64) {
        if self.ready_at_ms.is_none() {
            self.ready_at_ms = Some(now_ms);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready_at_ms.is_some()
    }

    fn reveal_start(&self) -> Option<f64> {
        self.ready_at_ms.map(|t| t + CANVAS_FADE_DELAY_MS)
    }

    /// Opacity of the loading screen.
    pub fn loading_alpha(&self, now_ms: f64) -> f32 {
        match self.reveal_start() {
            None => 1.0,
            Some(start) => 1.0 - ramp(now_ms, start, LOADING_FADE_MS),
        }
    }

    /// True once the loading screen has fully faded out.
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.reveal_start()
            .is_some_and(|start| now_ms >= start + LOADING_FADE_MS)
    }

    /// Opacity of the rendered scene.
    pub fn canvas_alpha(&self, now_ms: f64) -> f32 {
        self.reveal_start()
            .map_or(0.0, |start| ramp(now_ms, start, REVEAL_FADE_MS))
    }

    /// Opacity of the music player panel.
    pub fn player_alpha(&self, now_ms: f64) -> f32 {
        self.reveal_start().map_or(0.0, |start| {
            ramp(now_ms, start + MENU_FADE_DELAY_MS, REVEAL_FADE_MS)
        })
    }
}

/// Black veil over the scene while it fades in.
pub fn show_canvas_veil(ctx: &egui::Context, canvas_alpha: f32) {
    if canvas_alpha >= 1.0 {
        return;
    }
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("canvas-veil"),
    ));
    let veil = ((1.0 - canvas_alpha) * 255.0) as u8;
    painter.rect_filled(ctx.screen_rect(), 0.0, egui::Color32::from_black_alpha(veil));
}

/// Full-screen loading screen. It swallows pointer input while visible.
pub fn show_loading_screen(ctx: &egui::Context, alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new("loading-screen"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.allocate_rect(screen, egui::Sense::click_and_drag());
            let painter = ui.painter();
            let a = (alpha * 255.0) as u8;
            painter.rect_filled(screen, 0.0, egui::Color32::from_black_alpha(a));
            painter.text(
                screen.center(),
                egui::Align2::CENTER_CENTER,
                "LOADING",
                egui::FontId::proportional(18.0),
                egui::Color32::from_white_alpha(a),
            );
            let spinner_rect = egui::Rect::from_center_size(
                screen.center() + egui::vec2(0.0, 32.0),
                egui::vec2(20.0, 20.0),
            );
            ui.multiply_opacity(alpha);
            ui.put(spinner_rect, egui::Spinner::new());
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_before_ready() {
        let t = RevealTimeline::default();
        assert_eq!(t.loading_alpha(10_000.0), 1.0);
        assert_eq!(t.canvas_alpha(10_000.0), 0.0);
        assert_eq!(t.player_alpha(10_000.0), 0.0);
        assert!(!t.is_finished(10_000.0));
    }

    #[test]
    fn test_reveal_sequence() {
        let mut t = RevealTimeline::default();
        t.mark_ready(1000.0);
        t.mark_ready(5000.0); // ignored

        // fade delay
        assert_eq!(t.loading_alpha(1400.0), 1.0);
        assert_eq!(t.canvas_alpha(1400.0), 0.0);

        // halfway through the loading fade
        assert!((t.loading_alpha(1500.0 + 750.0) - 0.5).abs() < 1e-6);
        assert!(!t.is_finished(2999.0));
        assert!(t.is_finished(3000.0));
        assert_eq!(t.loading_alpha(3000.0), 0.0);
        assert_eq!(t.canvas_alpha(3000.0), 1.0);

        // the player waits for the menu delay
        assert_eq!(t.player_alpha(3500.0), 0.0);
        assert!((t.player_alpha(4000.0) - 0.5).abs() < 1e-6);
        assert_eq!(t.player_alpha(9000.0), 1.0);
    }
}
