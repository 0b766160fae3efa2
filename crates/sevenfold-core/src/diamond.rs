use crate::constants::DIAMOND_COUNT;
use crate::error::SceneError;
use crate::types::DiamondIndex;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Diamond table shipped with the web build.
pub const DIAMONDS_RON: &str = include_str!("../../../assets/diamonds.ron");

/// One landmark: where it floats, how big it is, and which track it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiamondDef {
    /// Display name shown in the music player.
    pub name: String,
    pub x: f32,
    pub z: f32,
    /// Y coordinate of the diamond's flat top.
    pub height: f32,
    /// Rim radius; the apex hangs `size` below the top.
    pub size: f32,
    /// Audio file name without extension; the platform picks the format.
    pub audio: String,
}

impl DiamondDef {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.height, self.z)
    }
}

/// The seven diamonds in index order.
#[derive(Debug, Clone, PartialEq)]
pub struct DiamondTable {
    diamonds: Vec<DiamondDef>,
}

impl DiamondTable {
    /// Parse and validate a RON list of diamonds.
    pub fn from_ron(ron_str: &str) -> Result<Self, SceneError> {
        let options = ron::Options::default();
        let diamonds: Vec<DiamondDef> = options
            .from_str(ron_str)
            .map_err(|e| SceneError::ConfigParse(e.to_string()))?;
        Self::from_defs(diamonds)
    }

    /// Validate an already-built list.
    pub fn from_defs(diamonds: Vec<DiamondDef>) -> Result<Self, SceneError> {
        if diamonds.len() != DIAMOND_COUNT {
            return Err(SceneError::ConfigInvalid(format!(
                "expected {DIAMOND_COUNT} diamonds, found {}",
                diamonds.len()
            )));
        }
        for (i, d) in diamonds.iter().enumerate() {
            if d.name.trim().is_empty() {
                return Err(SceneError::ConfigInvalid(format!("diamond {i} has no name")));
            }
            if d.audio.trim().is_empty() {
                return Err(SceneError::ConfigInvalid(format!(
                    "diamond '{}' has no audio file",
                    d.name
                )));
            }
            if !(d.size > 0.0) {
                return Err(SceneError::ConfigInvalid(format!(
                    "diamond '{}' has non-positive size {}",
                    d.name, d.size
                )));
            }
            if diamonds[..i].iter().any(|other| other.name == d.name) {
                return Err(SceneError::ConfigInvalid(format!(
                    "duplicate diamond name '{}'",
                    d.name
                )));
            }
        }
        Ok(Self { diamonds })
    }

    /// Table compiled into the binary.
    pub fn builtin() -> Self {
        let d = |name: &str, x: f32, z: f32, height: f32, size: f32, audio: &str| DiamondDef {
            name: name.to_string(),
            x,
            z,
            height,
            size,
            audio: audio.to_string(),
        };
        Self {
            diamonds: vec![
                d("DRIFT", -90.0, -30.0, 145.0, 7.0, "014_1"),
                d("STATIC", -40.0, -70.0, 142.0, 7.0, "015_1"),
                d("VOID", 45.0, -85.0, 138.0, 7.0, "016_1"),
                d("NEXUS", 0.0, 0.0, 150.0, 9.0, "007_1"),
                d("FRAGMENT", 80.0, 40.0, 140.0, 7.0, "020_1"),
                d("PULSE", 20.0, 100.0, 141.0, 7.0, "018_1"),
                d("ECHO", -60.0, 70.0, 143.0, 7.0, "019_1"),
            ],
        }
    }

    /// Load the shipped table, falling back to the built-in one.
    pub fn load_or_builtin() -> Self {
        match Self::from_ron(DIAMONDS_RON) {
            Ok(table) => table,
            Err(e) => {
                log::error!("{e}; using built-in diamond table");
                Self::builtin()
            }
        }
    }

    pub fn get(&self, index: DiamondIndex) -> &DiamondDef {
        &self.diamonds[index.get()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (DiamondIndex, &DiamondDef)> {
        DiamondIndex::all().zip(self.diamonds.iter())
    }

    pub fn len(&self) -> usize {
        self.diamonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diamonds.is_empty()
    }
}
