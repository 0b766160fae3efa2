use thiserror::Error;

/// Errors that can occur during Sevenfold initialization and runtime.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("WebGPU adapter not found: {0}")]
    AdapterNotFound(String),

    #[error("Failed to request GPU device: {0}")]
    DeviceRequestFailed(String),

    #[error("Surface configuration failed: {0}")]
    SurfaceConfigFailed(String),

    #[error("Canvas element not found: {0}")]
    CanvasNotFound(String),

    #[error("Failed to parse diamond table RON: {0}")]
    ConfigParse(String),

    #[error("Invalid diamond table: {0}")]
    ConfigInvalid(String),

    #[error("Diamond index {0} out of range")]
    InvalidDiamondIndex(usize),

    #[error("Browser API call failed: {0}")]
    BrowserApi(String),

    #[error("Audio initialization failed: {0}")]
    AudioInit(String),

    #[error("Failed to load track {index}: {reason}")]
    TrackLoad { index: usize, reason: String },
}
