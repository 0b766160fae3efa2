use crate::constants::DIAMOND_COUNT;
use crate::error::SceneError;
use glam::Vec3;

/// Validated index into the diamond table (0..DIAMOND_COUNT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiamondIndex(u8);

impl DiamondIndex {
    /// Every index in table order.
    pub fn all() -> impl Iterator<Item = DiamondIndex> {
        (0..DIAMOND_COUNT as u8).map(DiamondIndex)
    }

    pub fn new(index: usize) -> Result<Self, SceneError> {
        if index < DIAMOND_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(SceneError::InvalidDiamondIndex(index))
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for DiamondIndex {
    type Error = SceneError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl std::fmt::Display for DiamondIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of diamond indices packed into the low DIAMOND_COUNT bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TrackSet(u8);

impl TrackSet {
    pub const EMPTY: TrackSet = TrackSet(0);

    pub fn contains(self, index: DiamondIndex) -> bool {
        self.0 & (1 << index.0) != 0
    }

    /// Returns true if the index was not already present.
    pub fn insert(&mut self, index: DiamondIndex) -> bool {
        let was = self.contains(index);
        self.0 |= 1 << index.0;
        !was
    }

    /// Returns true if the index was present.
    pub fn remove(&mut self, index: DiamondIndex) -> bool {
        let was = self.contains(index);
        self.0 &= !(1 << index.0);
        was
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = DiamondIndex> {
        DiamondIndex::all().filter(move |i| self.contains(*i))
    }
}

impl FromIterator<DiamondIndex> for TrackSet {
    fn from_iter<I: IntoIterator<Item = DiamondIndex>>(iter: I) -> Self {
        let mut set = TrackSet::EMPTY;
        for i in iter {
            set.insert(i);
        }
        set
    }
}

/// Camera position plus the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

/// Device class, chosen once at startup. Selects asset format and whether
/// audio is spatialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Desktop,
    Mobile,
}

impl Platform {
    pub fn is_mobile(self) -> bool {
        self == Platform::Mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: usize) -> DiamondIndex {
        DiamondIndex::new(i).expect("valid index")
    }

    #[test]
    fn test_index_bounds() {
        assert!(DiamondIndex::new(0).is_ok());
        assert!(DiamondIndex::new(6).is_ok());
        assert!(matches!(
            DiamondIndex::new(7),
            Err(SceneError::InvalidDiamondIndex(7))
        ));
        assert_eq!(DiamondIndex::all().count(), DIAMOND_COUNT);
    }

    #[test]
    fn test_track_set_insert_remove() {
        let mut set = TrackSet::EMPTY;
        assert!(set.is_empty());
        assert!(set.insert(idx(3)));
        assert!(!set.insert(idx(3)), "second insert is a no-op");
        assert!(set.insert(idx(6)));
        assert_eq!(set.len(), 2);
        assert!(set.contains(idx(3)));
        assert!(!set.contains(idx(0)));

        assert!(set.remove(idx(3)));
        assert!(!set.remove(idx(3)));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![idx(6)]);
    }

    #[test]
    fn test_track_set_iter_in_order() {
        let set: TrackSet = [idx(5), idx(1), idx(4)].into_iter().collect();
        let got: Vec<usize> = set.iter().map(DiamondIndex::get).collect();
        assert_eq!(got, vec![1, 4, 5]);
        let mut set = set;
        set.clear();
        assert!(set.is_empty());
    }
}
