const BINDINGS: &[(&str, &str)] = &[
    ("Click diamond", "Focus / unfocus"),
    ("Left Drag", "Orbit camera"),
    ("Right Drag", "Pan camera"),
    ("Scroll", "Zoom"),
    ("Z X C V B N M", "Focus diamond"),
    ("1-7", "Play / stop track"),
    ("P", "Play / stop focused track"),
    ("Q", "Stop all tracks"),
    ("R", "Reset view"),
    ("W A S D", "Move camera"),
    ("E / F", "Move up / down"),
    ("H", "Toggle this help"),
    ("Esc", "Close help / reset view"),
];

/// Controls tooltip listing all keybindings.
/// Returns true if the pointer is over the tooltip.
pub fn show(ctx: &egui::Context, open: &mut bool) -> bool {
    if !*open {
        return false;
    }

    let response = egui::Window::new("Controls")
        .open(open)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .show(ctx, |ui| {
            egui::Grid::new("controls-grid")
                .striped(true)
                .show(ui, |ui| {
                    for (key, action) in BINDINGS {
                        ui.strong(*key);
                        ui.label(*action);
                        ui.end_row();
                    }
                });
        });

    response.is_some_and(|r| r.response.contains_pointer())
}
