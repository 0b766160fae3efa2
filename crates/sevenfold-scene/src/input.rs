use crate::camera::{CameraRig, StepDirection};
use crate::store::SceneStore;
use sevenfold_core::DiamondIndex;

/// Number keys in music-player order: 1 is the centre diamond, then the
/// rest in table order.
const NUMBER_KEY_TRACKS: [(char, usize); 7] = [
    ('1', 3),
    ('2', 0),
    ('3', 1),
    ('4', 2),
    ('5', 4),
    ('6', 5),
    ('7', 6),
];

/// Bottom keyboard row, same order as the number keys.
const LETTER_KEY_FOCUS: [(char, usize); 7] = [
    ('z', 3),
    ('x', 0),
    ('c', 1),
    ('v', 2),
    ('b', 4),
    ('n', 5),
    ('m', 6),
];

/// Everything a key press, overlay click, or scene click can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleHelp,
    /// Close the help tooltip if open, otherwise leave focus.
    Escape,
    StopAll,
    ResetView,
    ToggleFocusedTrack,
    ToggleTrack(DiamondIndex),
    ToggleFocus(DiamondIndex),
    Step(StepDirection),
    ToggleDebug,
}

/// Overlay visibility flags that keyboard commands flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayFlags {
    pub help_visible: bool,
    pub debug_visible: bool,
}

/// Map a `KeyboardEvent.key` value to a command. Letters are
/// case-insensitive.
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        "Escape" => return Some(Command::Escape),
        "F3" => return Some(Command::ToggleDebug),
        _ => {}
    }

    let mut chars = key.chars();
    let c = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }

    if let Some(&(_, i)) = NUMBER_KEY_TRACKS.iter().find(|(k, _)| *k == c) {
        return DiamondIndex::new(i).ok().map(Command::ToggleTrack);
    }
    if let Some(&(_, i)) = LETTER_KEY_FOCUS.iter().find(|(k, _)| *k == c) {
        return DiamondIndex::new(i).ok().map(Command::ToggleFocus);
    }

    match c {
        'h' => Some(Command::ToggleHelp),
        'q' => Some(Command::StopAll),
        'r' => Some(Command::ResetView),
        'p' => Some(Command::ToggleFocusedTrack),
        'w' => Some(Command::Step(StepDirection::Forward)),
        's' => Some(Command::Step(StepDirection::Backward)),
        'a' => Some(Command::Step(StepDirection::Left)),
        'd' => Some(Command::Step(StepDirection::Right)),
        'e' => Some(Command::Step(StepDirection::Up)),
        'f' => Some(Command::Step(StepDirection::Down)),
        _ => None,
    }
}

/// Apply a command to the store, camera, and overlay flags.
pub fn apply_command(
    command: Command,
    store: &mut SceneStore,
    rig: &mut CameraRig,
    overlay: &mut OverlayFlags,
) {
    log::debug!("command: {command:?}");
    match command {
        Command::ToggleHelp => overlay.help_visible = !overlay.help_visible,
        Command::Escape => {
            if overlay.help_visible {
                overlay.help_visible = false;
            } else {
                store.reset_camera();
            }
        }
        Command::StopAll => store.stop_all_tracks(),
        Command::ResetView => store.reset_camera(),
        Command::ToggleFocusedTrack => {
            store.toggle_focused_track();
        }
        Command::ToggleTrack(i) => {
            store.toggle_track(i);
        }
        Command::ToggleFocus(i) => store.toggle_focus(i),
        Command::Step(direction) => rig.step(direction),
        Command::ToggleDebug => overlay.debug_visible = !overlay.debug_visible,
    }
}
