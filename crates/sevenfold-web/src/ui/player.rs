use sevenfold_core::{DiamondIndex, DiamondTable};
use sevenfold_scene::input::Command;
use sevenfold_scene::store::SceneStore;

/// Row order of the music player: the centre diamond first, then the rest
/// in table order (the same order as number keys 1-7).
pub const TRACK_ORDER: [usize; 7] = [3, 0, 1, 2, 4, 5, 6];

const HIGHLIGHT: egui::Color32 = egui::Color32::WHITE;
const DIM: egui::Color32 = egui::Color32::from_gray(140);

/// Label of the play button for a track.
pub fn button_label(armed: bool) -> &'static str {
    if armed {
        "⏸"
    } else {
        "▶"
    }
}

/// A track name stands out while its diamond is focused or its track armed.
pub fn is_highlighted(store: &SceneStore, index: DiamondIndex) -> bool {
    store.focused() == Some(index) || store.is_playing(index)
}

/// Music player panel. Clicking a name toggles focus, clicking its button
/// toggles the track.
pub fn show(
    ctx: &egui::Context,
    table: &DiamondTable,
    store: &SceneStore,
    alpha: f32,
    commands: &mut Vec<Command>,
) {
    if alpha <= 0.0 {
        return;
    }

    egui::Area::new(egui::Id::new("music-player"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
        .show(ctx, |ui| {
            ui.multiply_opacity(alpha);
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                for &i in &TRACK_ORDER {
                    let Ok(index) = DiamondIndex::new(i) else {
                        continue;
                    };
                    let def = table.get(index);
                    let armed = store.is_playing(index);
                    ui.horizontal(|ui| {
                        if ui.button(button_label(armed)).clicked() {
                            commands.push(Command::ToggleTrack(index));
                        }
                        let color = if is_highlighted(store, index) {
                            HIGHLIGHT
                        } else {
                            DIM
                        };
                        let name = egui::RichText::new(&def.name).monospace().color(color);
                        if ui
                            .add(egui::Label::new(name).sense(egui::Sense::click()))
                            .clicked()
                        {
                            commands.push(Command::ToggleFocus(index));
                        }
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: usize) -> DiamondIndex {
        DiamondIndex::new(i).expect("valid index")
    }

    #[test]
    fn test_track_order_matches_number_keys() {
        for (n, &i) in TRACK_ORDER.iter().enumerate() {
            let key = (n + 1).to_string();
            assert_eq!(
                sevenfold_scene::input::command_for_key(&key),
                Some(Command::ToggleTrack(idx(i)))
            );
        }
    }

    #[test]
    fn test_highlight_and_button() {
        let mut store = SceneStore::new(false);
        assert!(!is_highlighted(&store, idx(1)));

        store.set_focused(Some(idx(1)));
        assert!(is_highlighted(&store, idx(1)));

        store.toggle_track(idx(5));
        assert!(is_highlighted(&store, idx(5)));
        assert_eq!(button_label(store.is_playing(idx(5))), "⏸");
        assert_eq!(button_label(store.is_playing(idx(0))), "▶");
    }
}
