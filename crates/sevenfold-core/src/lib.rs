pub mod constants;
pub mod diamond;
pub mod error;
pub mod math;
pub mod platform;
pub mod types;

pub use diamond::{DiamondDef, DiamondTable};
pub use error::SceneError;
pub use types::{CameraPose, DiamondIndex, Platform, TrackSet};
