pub mod player;
pub mod spatial;

#[cfg(target_arch = "wasm32")]
pub mod bridge;

pub use player::{LoadState, TrackBackend, TrackPlayer};
pub use spatial::Listener;

/// Browser track player. The AudioContext is created immediately so decoding
/// can start before the first user gesture; output stays suspended until
/// `resume` is called from one.
#[cfg(target_arch = "wasm32")]
pub fn web_player(
    platform: sevenfold_core::Platform,
    table: &sevenfold_core::DiamondTable,
) -> Result<TrackPlayer<bridge::AudioBridge>, sevenfold_core::SceneError> {
    let bridge = bridge::AudioBridge::new()?;
    let mut player = TrackPlayer::new(bridge, platform, table);
    player.load_all();
    log::info!("audio: loading {} tracks for {:?}", table.len(), platform);
    Ok(player)
}
