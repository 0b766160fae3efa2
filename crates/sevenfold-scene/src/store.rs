use sevenfold_core::{DiamondIndex, TrackSet};

/// Effective state changes, drained once per frame by the camera,
/// audio, and overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    FocusChanged(Option<DiamondIndex>),
    TrackArmed(DiamondIndex),
    TrackDisarmed(DiamondIndex),
    Loaded,
}

/// Shared scene state: focus, armed tracks, spinning diamonds.
///
/// Every action that changes state records a [`SceneEvent`]; actions that
/// leave the state untouched record nothing.
#[derive(Debug, Default)]
pub struct SceneStore {
    focused: Option<DiamondIndex>,
    playing: TrackSet,
    spinning: TrackSet,
    is_loaded: bool,
    is_mobile: bool,
    events: Vec<SceneEvent>,
}

impl SceneStore {
    pub fn new(is_mobile: bool) -> Self {
        Self {
            is_mobile,
            ..Default::default()
        }
    }

    pub fn focused(&self) -> Option<DiamondIndex> {
        self.focused
    }

    pub fn playing(&self) -> TrackSet {
        self.playing
    }

    pub fn spinning(&self) -> TrackSet {
        self.spinning
    }

    pub fn is_playing(&self, index: DiamondIndex) -> bool {
        self.playing.contains(index)
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn set_loaded(&mut self) {
        if !self.is_loaded {
            self.is_loaded = true;
            self.events.push(SceneEvent::Loaded);
        }
    }

    pub fn set_focused(&mut self, focused: Option<DiamondIndex>) {
        if self.focused != focused {
            self.focused = focused;
            self.events.push(SceneEvent::FocusChanged(focused));
        }
    }

    /// Focus `index`, or return to the overview if it is already focused.
    pub fn toggle_focus(&mut self, index: DiamondIndex) {
        if self.focused == Some(index) {
            self.set_focused(None);
        } else {
            self.set_focused(Some(index));
        }
    }

    /// Clear focus so the camera returns to the overview pose.
    pub fn reset_camera(&mut self) {
        self.set_focused(None);
    }

    pub fn start_spinning(&mut self, index: DiamondIndex) {
        self.spinning.insert(index);
    }

    pub fn stop_spinning(&mut self, index: DiamondIndex) {
        self.spinning.remove(index);
    }

    pub fn play_track(&mut self, index: DiamondIndex) {
        if self.playing.insert(index) {
            self.events.push(SceneEvent::TrackArmed(index));
        }
    }

    pub fn stop_track(&mut self, index: DiamondIndex) {
        if self.playing.remove(index) {
            self.events.push(SceneEvent::TrackDisarmed(index));
        }
    }

    /// Arm or disarm a track together with its diamond's spin.
    /// Returns whether the track is armed afterwards.
    pub fn toggle_track(&mut self, index: DiamondIndex) -> bool {
        if self.playing.contains(index) {
            self.stop_track(index);
            self.stop_spinning(index);
            false
        } else {
            self.play_track(index);
            self.start_spinning(index);
            true
        }
    }

    /// Toggle the focused diamond's track. No-op without focus.
    pub fn toggle_focused_track(&mut self) -> Option<bool> {
        self.focused.map(|i| self.toggle_track(i))
    }

    pub fn stop_all_tracks(&mut self) {
        for index in self.playing.iter() {
            self.events.push(SceneEvent::TrackDisarmed(index));
        }
        self.playing.clear();
        self.spinning.clear();
    }

    /// Take the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: usize) -> DiamondIndex {
        DiamondIndex::new(i).expect("valid index")
    }

    #[test]
    fn test_toggle_track_arms_and_spins() {
        let mut store = SceneStore::new(false);
        assert!(store.toggle_track(idx(2)));
        assert!(store.is_playing(idx(2)));
        assert!(store.spinning().contains(idx(2)));

        assert!(!store.toggle_track(idx(2)));
        assert!(!store.is_playing(idx(2)));
        assert!(!store.spinning().contains(idx(2)));

        assert_eq!(
            store.drain_events(),
            vec![
                SceneEvent::TrackArmed(idx(2)),
                SceneEvent::TrackDisarmed(idx(2))
            ]
        );
    }

    #[test]
    fn test_stop_all_clears_both_sets() {
        let mut store = SceneStore::new(false);
        store.toggle_track(idx(0));
        store.toggle_track(idx(5));
        store.drain_events();

        store.stop_all_tracks();
        assert!(store.playing().is_empty());
        assert!(store.spinning().is_empty());
        assert_eq!(
            store.drain_events(),
            vec![
                SceneEvent::TrackDisarmed(idx(0)),
                SceneEvent::TrackDisarmed(idx(5))
            ]
        );

        // Nothing armed: no events.
        store.stop_all_tracks();
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_focus_events_only_on_change() {
        let mut store = SceneStore::new(false);
        store.set_focused(Some(idx(3)));
        store.set_focused(Some(idx(3)));
        store.reset_camera();
        store.reset_camera();
        assert_eq!(
            store.drain_events(),
            vec![
                SceneEvent::FocusChanged(Some(idx(3))),
                SceneEvent::FocusChanged(None)
            ]
        );
    }

    #[test]
    fn test_toggle_focus() {
        let mut store = SceneStore::new(false);
        store.toggle_focus(idx(4));
        assert_eq!(store.focused(), Some(idx(4)));
        store.toggle_focus(idx(1));
        assert_eq!(store.focused(), Some(idx(1)));
        store.toggle_focus(idx(1));
        assert_eq!(store.focused(), None);
    }

    #[test]
    fn test_toggle_focused_track_without_focus() {
        let mut store = SceneStore::new(false);
        assert_eq!(store.toggle_focused_track(), None);
        assert!(store.playing().is_empty());

        store.set_focused(Some(idx(6)));
        assert_eq!(store.toggle_focused_track(), Some(true));
        assert!(store.is_playing(idx(6)));
    }

    #[test]
    fn test_loaded_once() {
        let mut store = SceneStore::new(true);
        assert!(store.is_mobile());
        assert!(!store.is_loaded());
        store.set_loaded();
        store.set_loaded();
        assert!(store.is_loaded());
        assert_eq!(store.drain_events(), vec![SceneEvent::Loaded]);
    }
}
