use crate::spatial::{self, Listener};
use glam::Vec3;
use sevenfold_core::constants::DIAMOND_COUNT;
use sevenfold_core::platform::track_url;
use sevenfold_core::{DiamondIndex, DiamondTable, Platform, SceneError, TrackSet};

/// Lifecycle of one track's decoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Ready,
    Failed,
}

/// Sound output the player drives. The browser implementation lives in
/// `bridge`; tests use an in-memory recorder.
pub trait TrackBackend {
    /// Start fetching and decoding a track. Completion is reported later
    /// through `poll_loads`.
    fn begin_load(&mut self, index: DiamondIndex, url: &str);

    /// Loads that finished since the last poll.
    fn poll_loads(&mut self) -> Vec<(DiamondIndex, Result<(), SceneError>)>;

    /// Begin looping a loaded track at the given gain and pan.
    fn start(&mut self, index: DiamondIndex, gain: f32, pan: f32) -> Result<(), SceneError>;

    fn stop(&mut self, index: DiamondIndex);

    /// Update gain and pan of a sounding track.
    fn set_spatial(&mut self, index: DiamondIndex, gain: f32, pan: f32);

    /// Unlock output after a user gesture.
    fn resume(&mut self);
}

/// Keeps the sounding tracks in line with the armed set.
///
/// Each frame every armed track with a ready buffer that is not sounding is
/// started, and every sounding track that is no longer armed is stopped. A
/// track armed before its load completes starts on the first frame after.
pub struct TrackPlayer<B: TrackBackend> {
    backend: B,
    platform: Platform,
    states: [LoadState; DIAMOND_COUNT],
    sounding: TrackSet,
    sources: [Vec3; DIAMOND_COUNT],
    urls: Vec<String>,
}

impl<B: TrackBackend> TrackPlayer<B> {
    pub fn new(backend: B, platform: Platform, table: &DiamondTable) -> Self {
        let mut sources = [Vec3::ZERO; DIAMOND_COUNT];
        let mut urls = Vec::with_capacity(DIAMOND_COUNT);
        for (index, def) in table.iter() {
            sources[index.get()] = def.position();
            urls.push(track_url(platform, &def.audio));
        }
        Self {
            backend,
            platform,
            states: [LoadState::Unloaded; DIAMOND_COUNT],
            sounding: TrackSet::EMPTY,
            sources,
            urls,
        }
    }

    /// Request every track that has not been requested yet.
    pub fn load_all(&mut self) {
        for index in DiamondIndex::all() {
            let i = index.get();
            if self.states[i] != LoadState::Unloaded {
                continue;
            }
            let Some(url) = self.urls.get(i) else {
                continue;
            };
            log::debug!("loading track {index} from {url}");
            self.backend.begin_load(index, url);
            self.states[i] = LoadState::Loading;
        }
    }

    pub fn resume(&mut self) {
        self.backend.resume();
    }

    /// Apply finished loads, then reconcile against `armed` and refresh the
    /// spatial mix of everything sounding.
    pub fn update(&mut self, armed: TrackSet, listener: &Listener) {
        for (index, result) in self.backend.poll_loads() {
            let state = &mut self.states[index.get()];
            match result {
                Ok(()) => {
                    log::info!("track {index} ready");
                    *state = LoadState::Ready;
                }
                Err(e) => {
                    log::error!("{e}");
                    *state = LoadState::Failed;
                }
            }
        }

        for index in self.sounding.iter() {
            if !armed.contains(index) {
                self.backend.stop(index);
                self.sounding.remove(index);
            }
        }

        for index in DiamondIndex::all() {
            let source = self.sources[index.get()];
            let (gain, pan) = spatial::spatialize(index, self.platform, listener, source);

            if self.sounding.contains(index) {
                self.backend.set_spatial(index, gain, pan);
                continue;
            }
            if !armed.contains(index) || self.states[index.get()] != LoadState::Ready {
                continue;
            }
            match self.backend.start(index, gain, pan) {
                Ok(()) => {
                    self.sounding.insert(index);
                }
                Err(e) => {
                    log::error!("track {index} failed to start: {e}");
                    self.states[index.get()] = LoadState::Failed;
                }
            }
        }
    }

    pub fn load_state(&self, index: DiamondIndex) -> LoadState {
        self.states[index.get()]
    }

    /// Number of tracks that have finished loading, successfully or not.
    pub fn settled_count(&self) -> usize {
        self.states
            .iter()
            .filter(|s| matches!(s, LoadState::Ready | LoadState::Failed))
            .count()
    }

    pub fn sounding(&self) -> TrackSet {
        self.sounding
    }

    pub fn is_sounding(&self, index: DiamondIndex) -> bool {
        self.sounding.contains(index)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load(usize, String),
        Start(usize),
        Stop(usize),
        Resume,
    }

    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<Call>,
        finished: Vec<(DiamondIndex, Result<(), SceneError>)>,
        fail_start: bool,
        last_spatial: Option<(usize, f32, f32)>,
    }

    impl TrackBackend for RecordingBackend {
        fn begin_load(&mut self, index: DiamondIndex, url: &str) {
            self.calls.push(Call::Load(index.get(), url.to_string()));
        }

        fn poll_loads(&mut self) -> Vec<(DiamondIndex, Result<(), SceneError>)> {
            std::mem::take(&mut self.finished)
        }

        fn start(&mut self, index: DiamondIndex, gain: f32, pan: f32) -> Result<(), SceneError> {
            if self.fail_start {
                return Err(SceneError::AudioInit("no context".into()));
            }
            self.calls.push(Call::Start(index.get()));
            self.last_spatial = Some((index.get(), gain, pan));
            Ok(())
        }

        fn stop(&mut self, index: DiamondIndex) {
            self.calls.push(Call::Stop(index.get()));
        }

        fn set_spatial(&mut self, index: DiamondIndex, gain: f32, pan: f32) {
            self.last_spatial = Some((index.get(), gain, pan));
        }

        fn resume(&mut self) {
            self.calls.push(Call::Resume);
        }
    }

    fn idx(i: usize) -> DiamondIndex {
        DiamondIndex::new(i).expect("valid index")
    }

    fn player(platform: Platform) -> TrackPlayer<RecordingBackend> {
        let mut p = TrackPlayer::new(
            RecordingBackend::default(),
            platform,
            &DiamondTable::builtin(),
        );
        p.load_all();
        p
    }

    fn finish(p: &mut TrackPlayer<RecordingBackend>, i: usize, ok: bool) {
        let result = if ok {
            Ok(())
        } else {
            Err(SceneError::TrackLoad {
                index: i,
                reason: "404".into(),
            })
        };
        p.backend.finished.push((idx(i), result));
    }

    fn armed(indices: &[usize]) -> TrackSet {
        indices.iter().map(|&i| idx(i)).collect()
    }

    #[test]
    fn test_load_all_requests_each_track_once() {
        let mut p = player(Platform::Desktop);
        p.load_all();
        let loads: Vec<_> = p
            .backend()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Load(..)))
            .collect();
        assert_eq!(loads.len(), DIAMOND_COUNT);
        assert_eq!(p.load_state(idx(0)), LoadState::Loading);
        assert_eq!(p.backend().calls[0], Call::Load(0, "./audio/014_1.ogg".into()));
    }

    #[test]
    fn test_mobile_urls() {
        let p = player(Platform::Mobile);
        assert_eq!(
            p.backend().calls[3],
            Call::Load(3, "./mobile_audio/007_1.m4a".into())
        );
    }

    #[test]
    fn test_armed_before_load_starts_on_load() {
        let mut p = player(Platform::Desktop);
        let listener = Listener::default();

        p.update(armed(&[2]), &listener);
        assert!(!p.is_sounding(idx(2)));

        finish(&mut p, 2, true);
        p.update(armed(&[2]), &listener);
        assert!(p.is_sounding(idx(2)));
        assert!(p.backend().calls.contains(&Call::Start(2)));
    }

    #[test]
    fn test_disarmed_before_load_never_starts() {
        let mut p = player(Platform::Desktop);
        let listener = Listener::default();

        p.update(armed(&[5]), &listener);
        finish(&mut p, 5, true);
        p.update(TrackSet::EMPTY, &listener);
        p.update(TrackSet::EMPTY, &listener);

        assert!(!p.is_sounding(idx(5)));
        assert!(!p.backend().calls.contains(&Call::Start(5)));
        assert_eq!(p.load_state(idx(5)), LoadState::Ready);
    }

    #[test]
    fn test_disarm_stops_once() {
        let mut p = player(Platform::Desktop);
        let listener = Listener::default();
        finish(&mut p, 1, true);
        p.update(armed(&[1]), &listener);
        p.update(TrackSet::EMPTY, &listener);
        p.update(TrackSet::EMPTY, &listener);

        let stops = p
            .backend()
            .calls
            .iter()
            .filter(|c| **c == Call::Stop(1))
            .count();
        assert_eq!(stops, 1);
        assert!(p.sounding().is_empty());
    }

    #[test]
    fn test_failed_load_stays_silent() {
        let mut p = player(Platform::Desktop);
        let listener = Listener::default();
        finish(&mut p, 0, false);
        p.update(armed(&[0]), &listener);
        p.update(armed(&[0]), &listener);
        assert_eq!(p.load_state(idx(0)), LoadState::Failed);
        assert!(!p.is_sounding(idx(0)));
        assert_eq!(p.settled_count(), 1);
    }

    #[test]
    fn test_start_failure_marks_failed() {
        let mut p = player(Platform::Desktop);
        p.backend.fail_start = true;
        finish(&mut p, 6, true);
        p.update(armed(&[6]), &Listener::default());
        assert_eq!(p.load_state(idx(6)), LoadState::Failed);
        assert!(p.sounding().is_empty());
    }

    #[test]
    fn test_mobile_mix_uses_flat_gain() {
        let mut p = player(Platform::Mobile);
        finish(&mut p, 4, true);
        let listener = Listener {
            position: Vec3::new(1000.0, 0.0, 0.0),
            right: Vec3::X,
        };
        p.update(armed(&[4]), &listener);
        assert_eq!(p.backend().last_spatial, Some((4, 0.9375, 0.0)));
    }

    #[test]
    fn test_resume_forwards() {
        let mut p = player(Platform::Desktop);
        p.resume();
        assert_eq!(p.backend().calls.last(), Some(&Call::Resume));
    }
}
